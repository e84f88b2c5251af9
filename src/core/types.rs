use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{MockforgeError, Result};

/// One parameter or return value of a method signature.
///
/// Identity is positional within its owning list. For variadic parameters
/// `ty` holds the element type; the ellipsis is re-applied by the renderer
/// in parameter position and converted to a slice in field position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: String,
    pub variadic: bool,
}

impl Param {
    pub fn named(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            variadic: false,
        }
    }

    pub fn bare(ty: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            ty: ty.into(),
            variadic: false,
        }
    }

    /// Type as written in function-parameter position.
    pub fn param_type(&self) -> String {
        if self.variadic {
            format!("...{}", self.ty)
        } else {
            self.ty.clone()
        }
    }

    /// Type as written in struct-field position; variadic becomes a slice.
    pub fn field_type(&self) -> String {
        if self.variadic {
            format!("[]{}", self.ty)
        } else {
            self.ty.clone()
        }
    }
}

/// An exported method bound to the target receiver type.
///
/// Empty parameter lists mean "no parameters/returns"; there is no
/// nil-vs-empty distinction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub request_params: Vec<Param>,
    pub response_params: Vec<Param>,
}

/// Kind of the source type a generation request starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FromType {
    Struct,
    Interface,
}

/// Kind of artifact a generation request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToType {
    Interface,
    Mock,
}

impl FromType {
    /// The three permitted relationship pairs: struct/interface, struct/mock
    /// and interface/mock.
    pub fn permits(self, to: ToType) -> bool {
        matches!(
            (self, to),
            (FromType::Struct, ToType::Interface)
                | (FromType::Struct, ToType::Mock)
                | (FromType::Interface, ToType::Mock)
        )
    }
}

impl fmt::Display for FromType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FromType::Struct => "struct",
            FromType::Interface => "interface",
        })
    }
}

impl fmt::Display for ToType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToType::Interface => "interface",
            ToType::Mock => "mock",
        })
    }
}

/// One generation request: built per invocation, populated by the extraction
/// and parsing stages, consumed once by the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub module: String,
    pub package: String,
    pub type_name: String,
    pub from: FromType,
    pub to: ToType,
    pub methods: Vec<Method>,
}

impl Request {
    pub fn new(
        module: impl Into<String>,
        package: impl Into<String>,
        type_name: impl Into<String>,
        from: FromType,
        to: ToType,
    ) -> Self {
        Self {
            module: module.into(),
            package: package.into(),
            type_name: type_name.into(),
            from,
            to,
            methods: Vec::new(),
        }
    }

    /// Checks every rule and reports all violations at once.
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();

        for (field, value) in [
            ("module", &self.module),
            ("package", &self.package),
            ("type", &self.type_name),
        ] {
            if value.is_empty() {
                violations.push(format!("'{field}' cannot be empty"));
            }
        }

        // package and type are interpolated into scan patterns and emitted
        // identifiers, so they must be plain identifiers
        for (field, value) in [("package", &self.package), ("type", &self.type_name)] {
            if !value.is_empty() && !is_identifier(value) {
                violations.push(format!("'{field}' must be a valid identifier"));
            }
        }

        if !self.from.permits(self.to) {
            violations.push(format!(
                "invalid mapping '{}/{}'; must be one of 'struct/interface', 'struct/mock', or 'interface/mock'",
                self.from, self.to
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(MockforgeError::Validation(violations))
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permitted_relationship_pairs() {
        assert!(FromType::Struct.permits(ToType::Interface));
        assert!(FromType::Struct.permits(ToType::Mock));
        assert!(FromType::Interface.permits(ToType::Mock));

        assert!(!FromType::Interface.permits(ToType::Interface));
    }

    #[test]
    fn test_valid_request_passes() {
        let request = Request::new("github.com/acme/store", "store", "Client", FromType::Struct, ToType::Mock);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validation_reports_every_violation_at_once() {
        let request = Request::new("", "", "", FromType::Interface, ToType::Interface);

        let err = request.validate().unwrap_err();
        match err {
            MockforgeError::Validation(violations) => {
                assert_eq!(violations.len(), 4);
                assert!(violations[0].contains("'module'"));
                assert!(violations[1].contains("'package'"));
                assert!(violations[2].contains("'type'"));
                assert!(violations[3].contains("invalid mapping 'interface/interface'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validation_rejects_non_identifier_names() {
        let request = Request::new("m", "a.b", "Cli ent", FromType::Struct, ToType::Interface);

        let err = request.validate().unwrap_err();
        match err {
            MockforgeError::Validation(violations) => {
                assert_eq!(violations.len(), 2);
                assert!(violations.iter().all(|v| v.contains("valid identifier")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_variadic_param_type_forms() {
        let p = Param {
            name: "ids".to_string(),
            ty: "string".to_string(),
            variadic: true,
        };

        assert_eq!(p.param_type(), "...string");
        assert_eq!(p.field_type(), "[]string");

        let q = Param::named("id", "int");
        assert_eq!(q.param_type(), "int");
        assert_eq!(q.field_type(), "int");
    }
}
