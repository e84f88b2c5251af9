use rayon::prelude::*;
use regex::{Captures, Regex};
use tracing::warn;

use super::types::{Method, Param};
use crate::error::Result;

/// The four signature shapes the grammar recognizes, tried in this order;
/// the first match wins.
#[derive(Debug, PartialEq, Eq)]
enum Shape {
    /// `Name()`
    Nullary { name: String },
    /// `Name(reqs) (resps)` or `Name(reqs) resp`
    Full {
        name: String,
        req: String,
        resp: String,
    },
    /// `Name() (resps)` or `Name() resp`
    ResponseOnly { name: String, resp: String },
    /// `Name(reqs)`
    RequestOnly { name: String, req: String },
}

/// Turns raw signature strings into structured methods: shape
/// classification, parameter splitting, implied-type propagation and
/// exported-type qualification.
pub struct SignatureParser {
    nullary: Regex,
    full: Regex,
    response_only: Regex,
    request_only: Regex,
    exported: Regex,
}

impl SignatureParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            nullary: Regex::new(r"^([A-Z][a-zA-Z0-9_]*)\(\)$")?,
            full: Regex::new(r"^([A-Z][a-zA-Z0-9_]*)\((.+)\)\s*\(?([^\)]+)\)?$")?,
            response_only: Regex::new(r"^([A-Z][a-zA-Z0-9_]*)\(\)\s*\(?([^\)]+)\)?$")?,
            request_only: Regex::new(r"^([A-Z][a-zA-Z0-9_]*)\((.+)\)$")?,
            // an exported type token: uppercase identifier at the start of the
            // expression or behind pointer/slice/paren punctuation; a leading
            // '.' means the token is already qualified and is left alone
            exported: Regex::new(r"(^|[\s\[\]\(\)\*])([A-Z][a-zA-Z0-9_]*)")?,
        })
    }

    /// Parses the sorted raw signatures into methods. Signatures matching
    /// none of the four shapes are dropped with a warning.
    pub fn parse(&self, signatures: &[String], package: &str) -> Vec<Method> {
        let mut methods = Vec::new();

        for raw in signatures {
            let raw = raw.trim();
            match self.classify(raw) {
                Some(Shape::Nullary { name }) => methods.push(Method {
                    name,
                    request_params: Vec::new(),
                    response_params: Vec::new(),
                }),
                Some(Shape::Full { name, req, resp }) => methods.push(Method {
                    name,
                    request_params: self.request_params(&req, package),
                    response_params: self.response_params(&resp, package),
                }),
                Some(Shape::ResponseOnly { name, resp }) => methods.push(Method {
                    name,
                    request_params: Vec::new(),
                    response_params: self.response_params(&resp, package),
                }),
                Some(Shape::RequestOnly { name, req }) => methods.push(Method {
                    name,
                    request_params: self.request_params(&req, package),
                    response_params: Vec::new(),
                }),
                None => {
                    warn!(signature = %raw, "signature matches no supported shape; skipping");
                }
            }
        }

        methods
    }

    fn classify(&self, signature: &str) -> Option<Shape> {
        if let Some(caps) = self.nullary.captures(signature) {
            return Some(Shape::Nullary {
                name: caps[1].to_string(),
            });
        }
        if let Some(caps) = self.full.captures(signature) {
            return Some(Shape::Full {
                name: caps[1].to_string(),
                req: caps[2].to_string(),
                resp: caps[3].to_string(),
            });
        }
        if let Some(caps) = self.response_only.captures(signature) {
            return Some(Shape::ResponseOnly {
                name: caps[1].to_string(),
                resp: caps[2].to_string(),
            });
        }
        if let Some(caps) = self.request_only.captures(signature) {
            return Some(Shape::RequestOnly {
                name: caps[1].to_string(),
                req: caps[2].to_string(),
            });
        }
        None
    }

    /// Request lists are sequential: implied-type propagation walks the list
    /// from the right, so element order matters.
    fn request_params(&self, list: &str, package: &str) -> Vec<Param> {
        let mut params: Vec<Param> = list
            .split(',')
            .map(|element| {
                let element = element.trim();
                match element.split_once(' ') {
                    Some((name, ty)) => {
                        let (ty, variadic) = self.typed(ty.trim(), package);
                        Param {
                            name: name.to_string(),
                            ty,
                            variadic,
                        }
                    }
                    // a lone token here is a name whose type is implied by
                    // its right-hand neighbor
                    None => Param::named(element, ""),
                }
            })
            .collect();

        for i in (1..params.len()).rev() {
            if params[i - 1].ty.is_empty() {
                params[i - 1].ty = params[i].ty.clone();
            }
        }

        params
    }

    /// Response lists run in two phases: phase one detects per-element names
    /// in parallel and OR-reduces them into the collective named/positional
    /// decision (the barrier); phase two assembles every element under that
    /// decision, also in parallel.
    fn response_params(&self, list: &str, package: &str) -> Vec<Param> {
        let elements: Vec<&str> = list.split(',').map(str::trim).collect();

        let named = elements
            .par_iter()
            .map(|element| element.contains(' '))
            .reduce(|| false, |a, b| a || b);

        elements
            .par_iter()
            .map(|element| {
                if !named {
                    let (ty, variadic) = self.typed(element, package);
                    return Param {
                        name: String::new(),
                        ty,
                        variadic,
                    };
                }

                match element.split_once(' ') {
                    Some((name, ty)) => {
                        let (ty, variadic) = self.typed(ty.trim(), package);
                        Param {
                            name: name.to_string(),
                            ty,
                            variadic,
                        }
                    }
                    // in a named list a lone token is still a bare type
                    None => {
                        let (ty, variadic) = self.typed(element, package);
                        Param {
                            name: String::new(),
                            ty,
                            variadic,
                        }
                    }
                }
            })
            .collect()
    }

    /// Splits off the variadic marker and qualifies the element type.
    fn typed(&self, token: &str, package: &str) -> (String, bool) {
        match token.strip_prefix("...") {
            Some(element) => (self.qualify(element, package), true),
            None => (self.qualify(token, package), false),
        }
    }

    /// Rewrites exported type references to be package-qualified so the
    /// emitted artifact stays valid outside its origin package.
    fn qualify(&self, ty: &str, package: &str) -> String {
        self.exported
            .replace_all(ty, |caps: &Captures| {
                format!("{}{package}.{}", &caps[1], &caps[2])
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(signature: &str, package: &str) -> Method {
        let parser = SignatureParser::new().unwrap();
        let methods = parser.parse(&[signature.to_string()], package);
        assert_eq!(methods.len(), 1, "expected one method from '{signature}'");
        methods.into_iter().next().unwrap()
    }

    #[test]
    fn test_nullary_signature() {
        let method = parse_one("Name()", "pkg");
        assert_eq!(method.name, "Name");
        assert!(method.request_params.is_empty());
        assert!(method.response_params.is_empty());
    }

    #[test]
    fn test_implied_types_propagate_backward() {
        let method = parse_one("Name(a, b int) error", "pkg");

        assert_eq!(
            method.request_params,
            vec![Param::named("a", "int"), Param::named("b", "int")]
        );
        assert_eq!(method.response_params, vec![Param::bare("error")]);
    }

    #[test]
    fn test_implied_types_propagate_across_groups() {
        let method = parse_one("Name(a, b, c int, d string)", "pkg");

        assert_eq!(
            method.request_params,
            vec![
                Param::named("a", "int"),
                Param::named("b", "int"),
                Param::named("c", "int"),
                Param::named("d", "string"),
            ]
        );
        assert!(method.response_params.is_empty());
    }

    #[test]
    fn test_unnamed_responses_are_all_positional() {
        let method = parse_one("Name(a int) (int, error)", "pkg");

        assert_eq!(method.request_params, vec![Param::named("a", "int")]);
        assert_eq!(
            method.response_params,
            vec![Param::bare("int"), Param::bare("error")]
        );
    }

    #[test]
    fn test_one_named_response_makes_the_list_named() {
        let method = parse_one("Name(a int, b error) (x int, err error)", "pkg");

        assert_eq!(
            method.response_params,
            vec![Param::named("x", "int"), Param::named("err", "error")]
        );
    }

    #[test]
    fn test_named_list_keeps_bare_tokens_as_types() {
        let method = parse_one("Name() (x int, error)", "pkg");

        assert_eq!(
            method.response_params,
            vec![Param::named("x", "int"), Param::bare("error")]
        );
    }

    #[test]
    fn test_single_response_without_parentheses() {
        let method = parse_one("Name() error", "pkg");
        assert!(method.request_params.is_empty());
        assert_eq!(method.response_params, vec![Param::bare("error")]);
    }

    #[test]
    fn test_exported_types_are_qualified() {
        let method = parse_one("Name(u User, ptr *Account) ([]Record, error)", "store");

        assert_eq!(
            method.request_params,
            vec![
                Param::named("u", "store.User"),
                Param::named("ptr", "*store.Account"),
            ]
        );
        assert_eq!(
            method.response_params,
            vec![Param::bare("[]store.Record"), Param::bare("error")]
        );
    }

    #[test]
    fn test_already_qualified_types_are_untouched() {
        let method = parse_one("Name(ctx context.Context) (io.Reader, error)", "store");

        assert_eq!(
            method.request_params,
            vec![Param::named("ctx", "context.Context")]
        );
        assert_eq!(
            method.response_params,
            vec![Param::bare("io.Reader"), Param::bare("error")]
        );
    }

    #[test]
    fn test_variadic_parameter_records_element_type() {
        let method = parse_one("Name(prefix string, ids ...ID)", "store");

        assert_eq!(
            method.request_params,
            vec![
                Param::named("prefix", "string"),
                Param {
                    name: "ids".to_string(),
                    ty: "store.ID".to_string(),
                    variadic: true,
                },
            ]
        );
    }

    #[test]
    fn test_unmatched_signatures_are_dropped() {
        let parser = SignatureParser::new().unwrap();
        let methods = parser.parse(
            &[
                "not a signature".to_string(),
                "lowercase()".to_string(),
                "Name()".to_string(),
            ],
            "pkg",
        );

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "Name");
    }

    #[test]
    fn test_shape_order_is_first_match_wins() {
        let parser = SignatureParser::new().unwrap();

        assert_eq!(
            parser.classify("Name()"),
            Some(Shape::Nullary {
                name: "Name".to_string()
            })
        );
        assert_eq!(
            parser.classify("Name(a int) error"),
            Some(Shape::Full {
                name: "Name".to_string(),
                req: "a int".to_string(),
                resp: "error".to_string(),
            })
        );
        assert_eq!(
            parser.classify("Name() error"),
            Some(Shape::ResponseOnly {
                name: "Name".to_string(),
                resp: "error".to_string(),
            })
        );
        assert_eq!(
            parser.classify("Name(a int)"),
            Some(Shape::RequestOnly {
                name: "Name".to_string(),
                req: "a int".to_string(),
            })
        );
        assert_eq!(parser.classify("name()"), None);
    }
}
