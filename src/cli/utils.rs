use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format. Object `data` is
/// merged into the JSON envelope; text output prints `text` when given.
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
    text: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".into(), json!(true));
            response.insert("message".into(), json!(message));
            if let Some(Value::Object(fields)) = data {
                response.extend(fields);
            }
            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => match text {
            Some(text) => println!("{}", text),
            None => println!("✓ {}", message),
        },
    }
    Ok(())
}
