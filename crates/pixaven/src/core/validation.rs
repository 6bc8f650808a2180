use serde_json::{Map, Value};

use crate::data::{InputMode, Job, JobSpec, Operation, ResponseMode};
use crate::error::{Error, Result};

pub(crate) const NO_INPUT: &str =
    "no file input specified: use either upload(path) or fetch(url) before sending";
pub(crate) const ONE_INPUT: &str =
    "only one file input method is accepted per job: upload(path) or fetch(url)";
pub(crate) const ONE_RESPONSE: &str =
    "only one response method is accepted per job: JSON, file or buffer";

/// Move the job's input state machine to `input`.
///
/// Unset → Upload | Fetch. Repeating the same kind replaces its argument;
/// switching kinds records an error and leaves the current input in place.
pub fn set_input(spec: &mut JobSpec, input: InputMode) {
    let empty = match &input {
        InputMode::Upload(path) => path.as_os_str().is_empty(),
        InputMode::Fetch(url) => url.is_empty(),
    };
    if empty {
        spec.fail(Error::configuration(match input {
            InputMode::Upload(_) => "upload(path) requires a valid file path",
            InputMode::Fetch(_) => "fetch(url) requires a valid file URL",
        }));
        return;
    }

    let conflict = spec
        .input
        .as_ref()
        .is_some_and(|current| current.kind() != input.kind());
    if conflict {
        spec.fail(Error::configuration(ONE_INPUT));
        return;
    }
    spec.input = Some(input);
}

/// Move the job's response state machine to `response`.
///
/// Unset → Json | File | Buffer, following the same rules as [`set_input`].
/// Binary modes are refused while a webhook or external storage is configured.
pub fn set_response(spec: &mut JobSpec, response: ResponseMode) {
    if let ResponseMode::File(path) = &response
        && path.as_os_str().is_empty()
    {
        spec.fail(Error::configuration(
            "response_file(path) requires a valid output file path",
        ));
        return;
    }

    let conflict = spec
        .response
        .as_ref()
        .is_some_and(|current| current.kind() != response.kind());
    if conflict {
        spec.fail(Error::configuration(ONE_RESPONSE));
        return;
    }

    if let Err(err) = check_binary_compatible(&response, &spec.operations) {
        spec.fail(err);
        return;
    }

    spec.response = Some(response);
}

/// Store operation parameters, last write wins. Empty parameters are ignored.
pub fn set_operation(spec: &mut JobSpec, op: Operation, params: Value) {
    if is_empty_params(&params) {
        return;
    }
    spec.operations.insert(op.as_str().to_string(), params);
}

/// Whether a parameter value counts as "not given".
pub fn is_empty_params(params: &Value) -> bool {
    match params {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Binary delivery is impossible when the API answers through a webhook or
/// writes the result to external storage.
pub fn check_binary_compatible(response: &ResponseMode, operations: &Map<String, Value>) -> Result<()> {
    if !response.is_binary() {
        return Ok(());
    }
    if operations.contains_key(Operation::Webhook.as_str()) {
        return Err(Error::configuration(format!(
            "binary responses ({}) are not supported when using webhooks",
            response.kind()
        )));
    }
    if operations.contains_key(Operation::Store.as_str()) {
        return Err(Error::configuration(format!(
            "binary responses ({}) are not supported when using external storage",
            response.kind()
        )));
    }
    Ok(())
}

/// Deferred validation pass: turn an accumulated spec into a sendable job.
///
/// Returns the first recorded error if there is one. A job without a chosen
/// response mode is delivered as JSON.
pub fn finalize(spec: JobSpec) -> Result<Job> {
    if let Some(err) = spec.pending_error {
        return Err(err);
    }

    let input = spec.input.ok_or_else(|| Error::configuration(NO_INPUT))?;
    let response = spec.response.unwrap_or(ResponseMode::Json);
    check_binary_compatible(&response, &spec.operations)?;

    Ok(Job {
        api_key: spec.api_key,
        input,
        operations: spec.operations,
        response,
        timeout_seconds: spec.timeout_seconds,
        proxy: spec.proxy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn spec() -> JobSpec {
        JobSpec {
            api_key: "key".to_string(),
            ..JobSpec::default()
        }
    }

    #[test]
    fn upload_then_fetch_conflicts() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Upload(PathBuf::from("in.jpg")));
        set_input(&mut spec, InputMode::Fetch("https://x/img.png".to_string()));

        assert_eq!(spec.input, Some(InputMode::Upload(PathBuf::from("in.jpg"))));
        assert!(matches!(finalize(spec), Err(Error::Configuration(m)) if m == ONE_INPUT));
    }

    #[test]
    fn fetch_then_upload_conflicts() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Fetch("https://x/img.png".to_string()));
        set_input(&mut spec, InputMode::Upload(PathBuf::from("in.jpg")));
        assert!(matches!(finalize(spec), Err(Error::Configuration(m)) if m == ONE_INPUT));
    }

    #[test]
    fn same_input_kind_replaces() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Fetch("https://x/a.png".to_string()));
        set_input(&mut spec, InputMode::Fetch("https://x/b.png".to_string()));
        assert!(spec.pending_error.is_none());
        assert_eq!(spec.input, Some(InputMode::Fetch("https://x/b.png".to_string())));
    }

    #[test]
    fn empty_input_is_error() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Fetch(String::new()));
        assert!(spec.input.is_none());
        assert!(spec.pending_error.is_some());
    }

    #[test]
    fn response_modes_conflict() {
        let pairs = [
            (ResponseMode::Json, ResponseMode::Buffer),
            (ResponseMode::Buffer, ResponseMode::File(PathBuf::from("out.jpg"))),
            (ResponseMode::File(PathBuf::from("out.jpg")), ResponseMode::Json),
        ];

        for (first, second) in pairs {
            let mut spec = spec();
            set_input(&mut spec, InputMode::Fetch("https://x/img.png".to_string()));
            set_response(&mut spec, first.clone());
            set_response(&mut spec, second);
            assert_eq!(spec.response, Some(first));
            assert!(matches!(finalize(spec), Err(Error::Configuration(m)) if m == ONE_RESPONSE));
        }
    }

    #[test]
    fn missing_input_regardless_of_response() {
        for mode in [
            None,
            Some(ResponseMode::Json),
            Some(ResponseMode::Buffer),
            Some(ResponseMode::File(PathBuf::from("out.jpg"))),
        ] {
            let mut spec = spec();
            if let Some(mode) = mode {
                set_response(&mut spec, mode);
            }
            assert!(matches!(finalize(spec), Err(Error::Configuration(m)) if m == NO_INPUT));
        }
    }

    #[test]
    fn webhook_before_binary_response() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Fetch("https://x/img.png".to_string()));
        set_operation(&mut spec, Operation::Webhook, json!({"url": "https://hook"}));
        set_response(&mut spec, ResponseMode::File(PathBuf::from("out.jpg")));

        assert!(spec.response.is_none());
        let err = finalize(spec).unwrap_err();
        assert!(err.to_string().contains("webhooks"));
    }

    #[test]
    fn webhook_after_binary_response() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Fetch("https://x/img.png".to_string()));
        set_response(&mut spec, ResponseMode::File(PathBuf::from("out.jpg")));
        set_operation(&mut spec, Operation::Webhook, json!({"url": "https://hook"}));

        let err = finalize(spec).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("webhooks"));
    }

    #[test]
    fn store_rejects_buffer() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Fetch("https://x/img.png".to_string()));
        set_operation(&mut spec, Operation::Store, json!({"provider": "s3"}));
        set_response(&mut spec, ResponseMode::Buffer);
        assert!(finalize(spec).unwrap_err().to_string().contains("external storage"));
    }

    #[test]
    fn webhook_with_json_is_fine() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Fetch("https://x/img.png".to_string()));
        set_operation(&mut spec, Operation::Webhook, json!({"url": "https://hook"}));
        set_response(&mut spec, ResponseMode::Json);
        assert!(finalize(spec).is_ok());
    }

    #[test]
    fn operations_last_write_wins_and_skip_empty() {
        let mut spec = spec();
        set_operation(&mut spec, Operation::Resize, json!({"width": 100}));
        set_operation(&mut spec, Operation::Resize, json!({"width": 200}));
        set_operation(&mut spec, Operation::Resize, json!({}));
        set_operation(&mut spec, Operation::Flip, Value::Null);

        assert_eq!(spec.operations.len(), 1);
        assert_eq!(spec.operations["resize"], json!({"width": 200}));
    }

    #[test]
    fn finalize_defaults_to_json() {
        let mut spec = spec();
        set_input(&mut spec, InputMode::Fetch("https://x/img.png".to_string()));
        let job = finalize(spec).unwrap();
        assert_eq!(job.response, ResponseMode::Json);
        assert_eq!(job.api_key, "key");
    }

    #[test]
    fn empty_params() {
        assert!(is_empty_params(&Value::Null));
        assert!(is_empty_params(&json!({})));
        assert!(is_empty_params(&json!([])));
        assert!(is_empty_params(&json!("")));
        assert!(!is_empty_params(&json!({"mode": "h"})));
        assert!(!is_empty_params(&json!(true)));
    }
}
