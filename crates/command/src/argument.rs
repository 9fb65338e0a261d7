use crate::registry::CommandRegistry;
use crate::value::Value;
use rankchat_host::World;

/// Everything a matcher may consult besides the token itself: the actor
/// directory (for `Player`) and the command forest (for `CommandName`).
pub(crate) struct MatchContext<'a> {
    pub world: &'a dyn World,
    pub registry: &'a CommandRegistry,
}

/// The closed set of typed matchers an argument node can carry. Literal
/// matching is handled by the node kind, not by an argument type.
///
/// Each variant validates exactly one token and produces a typed [`Value`]
/// or nothing; `fail` renders the human-readable rejection reason.
#[derive(Debug, Clone)]
pub enum ArgumentType {
    String,
    Integer { range: Option<(i64, i64)> },
    Float,
    Boolean,
    Location,
    Player,
    Target,
    Array { options: Vec<String> },
    Duration,
    /// The name of a registered root command. Used by `help`.
    CommandName,
}

impl ArgumentType {
    pub fn string() -> Self {
        ArgumentType::String
    }

    pub fn integer() -> Self {
        ArgumentType::Integer { range: None }
    }

    /// Integer constrained to an inclusive range.
    pub fn integer_range(min: i64, max: i64) -> Self {
        ArgumentType::Integer {
            range: Some((min, max)),
        }
    }

    pub fn float() -> Self {
        ArgumentType::Float
    }

    pub fn boolean() -> Self {
        ArgumentType::Boolean
    }

    pub fn location() -> Self {
        ArgumentType::Location
    }

    pub fn player() -> Self {
        ArgumentType::Player
    }

    pub fn target() -> Self {
        ArgumentType::Target
    }

    pub fn array(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ArgumentType::Array {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn duration() -> Self {
        ArgumentType::Duration
    }

    pub fn command_name() -> Self {
        ArgumentType::CommandName
    }

    pub(crate) fn matches(&self, token: &str, ctx: &MatchContext<'_>) -> Option<Value> {
        match self {
            ArgumentType::String => {
                (!token.is_empty()).then(|| Value::String(token.to_string()))
            }
            ArgumentType::Integer { range } => {
                let value = token.parse::<i64>().ok()?;
                if let Some((min, max)) = range {
                    if !(*min..=*max).contains(&value) {
                        return None;
                    }
                }
                Some(Value::Integer(value))
            }
            ArgumentType::Float => {
                is_float_token(token).then(|| Value::Float(token.parse().unwrap_or(0.0)))
            }
            ArgumentType::Boolean => match token {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            ArgumentType::Location => {
                // Each location token carries its raw text; the dispatcher
                // collapses three of them into one resolved coordinate.
                is_location_token(token).then(|| Value::String(token.to_string()))
            }
            ArgumentType::Player => ctx
                .world
                .actor_by_name(token)
                .map(|actor| Value::Player(actor.name())),
            ArgumentType::Target => {
                is_target_token(token).then(|| Value::Target(token.to_string()))
            }
            ArgumentType::Array { options } => options
                .iter()
                .any(|o| o == token)
                .then(|| Value::String(token.to_string())),
            ArgumentType::Duration => {
                is_duration_token(token).then(|| Value::Duration(token.to_string()))
            }
            ArgumentType::CommandName => ctx
                .registry
                .root_by_name(token)
                .map(|_| Value::String(token.to_string())),
        }
    }

    /// What would have been accepted, for the single-expected-type syntax
    /// failure message.
    pub(crate) fn fail(&self, token: &str) -> String {
        match self {
            ArgumentType::String => "Value must be of type string!".to_string(),
            ArgumentType::Integer { .. } => "Value must be valid number!".to_string(),
            ArgumentType::Float => "Value must be valid float!".to_string(),
            ArgumentType::Boolean => {
                format!("\"{token}\" can be either \"true\" or \"false\"")
            }
            ArgumentType::Location => {
                "Value needs to be a valid number, value can include: [~,^]".to_string()
            }
            ArgumentType::Player => format!("player: \"{token}\", is not in this world"),
            ArgumentType::Target => format!("{token} is not a valid target"),
            ArgumentType::Array { options } => format!(
                "\"{token}\" must be one of these values: {}",
                options.join(" | ")
            ),
            ArgumentType::Duration => format!(
                "\"{token}\" must be a value like \"10d\" or \"3s\" the first part is the length second is unit"
            ),
            ArgumentType::CommandName => format!("{token} should be a command name!"),
        }
    }

    /// The annotation rendered in help and syntax failure listings.
    pub(crate) fn type_name(&self) -> String {
        match self {
            ArgumentType::String => "string".to_string(),
            ArgumentType::Integer { .. } => "int".to_string(),
            ArgumentType::Float => "float".to_string(),
            ArgumentType::Boolean => "boolean".to_string(),
            ArgumentType::Location => "location".to_string(),
            ArgumentType::Player => "Player".to_string(),
            ArgumentType::Target => "Target".to_string(),
            ArgumentType::Array { options } => truncate_options(&options.join(" | ")),
            ArgumentType::Duration => "Duration".to_string(),
            ArgumentType::CommandName => "CommandName".to_string(),
        }
    }
}

/// Option lists longer than 26 characters are elided in help text.
fn truncate_options(joined: &str) -> String {
    let chars: Vec<char> = joined.chars().collect();
    if chars.len() >= 27 {
        let head: String = chars[..25].iter().collect();
        format!("{head}...")
    } else {
        joined.to_string()
    }
}

/// `digits.digits`, nothing else. Integers without a fractional part are
/// rejected so they fall through to less specific matchers.
fn is_float_token(token: &str) -> bool {
    let Some((int_part, frac_part)) = token.split_once('.') else {
        return false;
    };
    !int_part.is_empty()
        && !frac_part.is_empty()
        && int_part.chars().all(|c| c.is_ascii_digit())
        && frac_part.chars().all(|c| c.is_ascii_digit())
}

/// Optional `~`/`^` prefix, optional signed integer, optional fraction.
/// A bare prefix (`~`) is a zero offset.
fn is_location_token(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let rest = token.strip_prefix(['~', '^']).unwrap_or(token);
    if rest.is_empty() {
        // Just the prefix; a bare unprefixed token was non-empty, so this
        // can only happen for "~" or "^".
        return rest.len() != token.len();
    }
    let (signed, rest) = match rest.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, rest),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    if signed && int_part.is_empty() {
        return false;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(f) => !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()),
        None => true,
    }
}

/// `@` plus a single selector character, or a quoted phrase.
fn is_target_token(token: &str) -> bool {
    if let Some(rest) = token.strip_prefix('@') {
        return rest.chars().count() == 1;
    }
    token.len() >= 3 && token.starts_with('"') && token.ends_with('"')
}

/// One or more `<digits><unit>` segments (units `h d y s m w`), optionally
/// comma-joined.
fn is_duration_token(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let mut rest = token;
    let mut segments = 0;
    while !rest.is_empty() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];
        match rest.chars().next() {
            Some(unit) if "hdysmw".contains(unit) => rest = &rest[1..],
            _ => return false,
        }
        rest = rest.strip_prefix(',').unwrap_or(rest);
        segments += 1;
    }
    segments > 0
}
