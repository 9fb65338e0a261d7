use crate::error::{CommandResult, InternalError};
use rankchat_host::Vec3;

/// A parsed argument value, produced by [`ArgumentType::matches`] and handed
/// to the terminal callback through the argument set.
///
/// [`ArgumentType::matches`]: crate::argument::ArgumentType::matches
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Display name of a currently connected actor.
    Player(String),
    /// Raw target selector, e.g. `@a` or a quoted phrase.
    Target(String),
    /// Raw duration expression, e.g. `10d` or `1h,30m`.
    Duration(String),
    /// A resolved coordinate, synthesized from three location tokens.
    Location(Vec3),
}

impl Value {
    fn type_error(&self, expected: &str) -> InternalError {
        InternalError::WrongArgumentType {
            name: format!("{:?}", self),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn as_string(&self) -> CommandResult<&String> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.type_error("String").into()),
        }
    }

    pub(crate) fn as_integer(&self) -> CommandResult<i64> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(self.type_error("Integer").into()),
        }
    }

    pub(crate) fn as_float(&self) -> CommandResult<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => Err(self.type_error("Float").into()),
        }
    }

    pub(crate) fn as_boolean(&self) -> CommandResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.type_error("Boolean").into()),
        }
    }

    pub(crate) fn as_player(&self) -> CommandResult<&String> {
        match self {
            Value::Player(p) => Ok(p),
            _ => Err(self.type_error("Player").into()),
        }
    }

    pub(crate) fn as_target(&self) -> CommandResult<&String> {
        match self {
            Value::Target(t) => Ok(t),
            _ => Err(self.type_error("Target").into()),
        }
    }

    pub(crate) fn as_duration(&self) -> CommandResult<&String> {
        match self {
            Value::Duration(d) => Ok(d),
            _ => Err(self.type_error("Duration").into()),
        }
    }

    pub(crate) fn as_location(&self) -> CommandResult<Vec3> {
        match self {
            Value::Location(l) => Ok(*l),
            _ => Err(self.type_error("Location").into()),
        }
    }
}

/// Resolves three location tokens against the invoker. `~` offsets from the
/// current position, `^` offsets along the view vector, unprefixed numbers
/// are absolute.
pub(crate) fn resolve_location(tokens: [&str; 3], position: Vec3, view: Vec3) -> Vec3 {
    let position = [position.x, position.y, position.z];
    let view = [view.x, view.y, view.z];

    let mut out = [0.0; 3];
    for (axis, token) in tokens.iter().enumerate() {
        let rest = token.strip_prefix(['~', '^']).unwrap_or(token);
        let offset = rest.parse::<f64>().unwrap_or(0.0);
        out[axis] = if token.starts_with('~') {
            offset + position[axis]
        } else if token.starts_with('^') {
            offset + view[axis]
        } else {
            offset
        };
    }

    Vec3::new(out[0], out[1], out[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_location_offsets_from_position() {
        let resolved = resolve_location(
            ["~5", "~0", "~-5"],
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert_eq!(resolved, Vec3::new(15.0, 0.0, 5.0));
    }

    #[test]
    fn caret_location_offsets_along_view() {
        let resolved = resolve_location(
            ["^", "^", "^2"],
            Vec3::new(0.0, 64.0, 0.0),
            Vec3::new(0.0, 0.5, 1.0),
        );
        assert_eq!(resolved, Vec3::new(0.0, 0.5, 3.0));
    }

    #[test]
    fn absolute_location_ignores_invoker() {
        let resolved = resolve_location(
            ["1", "2.5", "-3"],
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        assert_eq!(resolved, Vec3::new(1.0, 2.5, -3.0));
    }
}
