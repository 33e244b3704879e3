//! Driving the dispatcher from loose intent objects
//!
//! An intent-resolution collaborator (for example a language-model
//! translator) emits `{kind, parameters}` objects. This example feeds a few
//! of them, including the endpoint-path spelling and string-typed numbers,
//! through the validating boundary and prints the JSON the route layer
//! would return.

use caldera::{IntentRequest, QueryDispatcher};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = QueryDispatcher::new_embedded()?;

    let requests = [
        r#"{"kind": "nearest", "parameters": {"latitude": 1.3521, "longitude": 103.8198, "count": 3}}"#,
        r#"{"choice": "/volcanoes/radius", "latitude": "38.0", "longitude": "15.0", "radius": "300"}"#,
        r#"{"kind": "bounding-box"}"#,
    ];

    for raw in requests {
        println!("request: {raw}");
        let request = IntentRequest::from_json(raw)?;
        let results = dispatcher.dispatch_request(&request)?;
        println!("response: {}\n", serde_json::to_string_pretty(&results)?);
    }

    // Unsupported kinds are rejected, never guessed at.
    let bad = IntentRequest::from_json(r#"{"kind": "buffer"}"#)?;
    match dispatcher.dispatch_request(&bad) {
        Err(error) => println!("rejected as expected: {error}"),
        Ok(_) => unreachable!("unknown kind must not dispatch"),
    }

    Ok(())
}
