//! Tool: add. Sum two numbers.

use serde::Deserialize;
use serde_json::{json, Value};

use agentic_context::{Arguments, HandlerError, ParamSpec, ParamType, ReturnType, ToolDescriptor};

#[derive(Debug, Deserialize)]
struct AddParams {
    a: f64,
    b: f64,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new("add", execute)
        .with_description("Add two numbers")
        .with_param(ParamSpec::required("a", ParamType::Number))
        .with_param(ParamSpec::required("b", ParamType::Number))
        .with_returns(ReturnType::Number)
}

async fn execute(args: Arguments) -> Result<Value, HandlerError> {
    let params: AddParams = args.parse()?;
    Ok(json!(params.a + params.b))
}
