use serde::Serialize;
use tera::{Context, Tera};

use super::types::{Method, Param, Request, ToType};
use crate::error::Result;

const INTERFACE_TEMPLATE: &str = include_str!("../../templates/interface.go.tera");
const MOCK_TEMPLATE: &str = include_str!("../../templates/mock.go.tera");

/// Per-method template context. Everything with structure is precomputed
/// here so the templates only loop and interpolate.
#[derive(Serialize)]
struct MethodContext {
    name: String,
    /// `a int, ids ...string`
    params: String,
    /// `(x int, err error)`, or empty for void methods
    results: String,
    /// Element type of the call-history slice.
    called_with_type: String,
    /// False only for single-parameter methods, which record the argument
    /// directly instead of through a synthesized input struct.
    has_input_struct: bool,
    input_fields: String,
    /// Expression appended to the call history on each invocation.
    record_expr: String,
    /// Argument list forwarded to the override, `...` re-applied.
    call_args: String,
}

/// Renders a populated request into Go source text. Pure: no I/O, and
/// rendering the same request twice yields byte-identical output.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("interface.go.tera", INTERFACE_TEMPLATE),
            ("mock.go.tera", MOCK_TEMPLATE),
        ])?;
        tera.autoescape_on(vec![]);

        Ok(Self { tera })
    }

    pub fn render(&self, request: &Request) -> Result<String> {
        let methods: Vec<MethodContext> = request.methods.iter().map(method_context).collect();

        let mut context = Context::new();
        context.insert("methods", &methods);

        let template = match request.to {
            ToType::Interface => {
                context.insert(
                    "package_name",
                    &format!("{}{}iface", request.package, request.type_name).to_lowercase(),
                );
                context.insert(
                    "type_name",
                    &format!("{}{}API", title(&request.package), title(&request.type_name)),
                );
                "interface.go.tera"
            }
            ToType::Mock => {
                context.insert(
                    "mock_name",
                    &format!("{}{}", title(&request.package), title(&request.type_name)),
                );
                "mock.go.tera"
            }
        };

        Ok(self.tera.render(template, &context)?)
    }
}

fn method_context(method: &Method) -> MethodContext {
    let single = method.request_params.len() == 1;

    let called_with_type = if single {
        method.request_params[0].field_type()
    } else {
        format!("{}Input", method.name)
    };

    let input_fields = method
        .request_params
        .iter()
        .map(|p| format!("\t{} {}\n", title(&p.name), p.field_type()))
        .collect::<String>();

    let record_expr = if single {
        method.request_params[0].name.clone()
    } else if method.request_params.is_empty() {
        format!("{}Input{{}}", method.name)
    } else {
        let fields = method
            .request_params
            .iter()
            .map(|p| format!("\t\t{}: {},\n", title(&p.name), p.name))
            .collect::<String>();
        format!("{}Input{{\n{fields}\t}}", method.name)
    };

    let call_args = method
        .request_params
        .iter()
        .map(|p| {
            if p.variadic {
                format!("{}...", p.name)
            } else {
                p.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    MethodContext {
        name: method.name.clone(),
        params: param_list(&method.request_params),
        results: result_list(&method.response_params),
        called_with_type,
        has_input_struct: !single,
        input_fields: if single { String::new() } else { input_fields },
        record_expr,
        call_args,
    }
}

/// `name type` pairs joined with `, `; the name token is omitted when empty.
fn param_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| {
            let ty = p.param_type();
            match (p.name.is_empty(), ty.is_empty()) {
                (true, _) => ty,
                (_, true) => p.name.clone(),
                _ => format!("{} {}", p.name, ty),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn result_list(params: &[Param]) -> String {
    if params.is_empty() {
        return String::new();
    }
    format!("({})", param_list(params))
}

/// Uppercases the first letter; stable under repeated application.
fn title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
