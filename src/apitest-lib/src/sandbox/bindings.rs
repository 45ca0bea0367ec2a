use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::error::JsNativeErrorKind;
use boa_engine::{
    js_string, Context, JsError, JsNativeError, JsObject, JsResult, JsValue, NativeFunction,
    Source,
};

use super::ScriptInput;

/// Target under which script output is logged.
pub const SCRIPT_LOG_TARGET: &str = "apitest::script";

const FREEZE_PRELUDE: &str = r#"
(() => {
  const freeze = (v) => {
    if (v !== null && typeof v === "object" && !Object.isFrozen(v)) {
      Object.freeze(v);
      Object.getOwnPropertyNames(v).forEach((k) => freeze(v[k]));
    }
    return v;
  };
  [assert, console, body, header, params, records].forEach(freeze);
})();
"#;

// Non-writable, non-configurable.
fn read_only() -> Attribute {
    Attribute::ENUMERABLE
}

/// Installs the assertion surface and inputs as frozen globals.
pub fn install(context: &mut Context, input: &ScriptInput) -> JsResult<()> {
    register_assert(context)?;
    register_console(context)?;

    let status = JsValue::from(i32::from(input.status));
    let body = JsValue::from_json(&input.body, context)?;
    let header = JsValue::from_json(&serde_json::to_value(&input.headers).unwrap_or_default(), context)?;
    let params = JsValue::from_json(&serde_json::Value::Object(input.params.clone()), context)?;
    let records = JsValue::from_json(&input.records, context)?;

    context.register_global_property(js_string!("status"), status, read_only())?;
    context.register_global_property(js_string!("body"), body, read_only())?;
    context.register_global_property(js_string!("header"), header, read_only())?;
    context.register_global_property(js_string!("params"), params, read_only())?;
    context.register_global_property(js_string!("records"), records, read_only())?;

    context.eval(Source::from_bytes(FREEZE_PRELUDE))?;
    Ok(())
}

fn register_assert(context: &mut Context) -> JsResult<()> {
    // Captured before the script runs so reassigning `JSON` cannot change the comparison.
    let json = context.global_object().get(js_string!("JSON"), context)?;
    let stringify = match json.as_object() {
        Some(json) => json.get(js_string!("stringify"), context)?,
        None => JsValue::undefined(),
    };
    let stringify = stringify
        .as_object()
        .cloned()
        .ok_or_else(|| JsNativeError::typ().with_message("JSON.stringify is not callable"))?;
    let deep_equal = NativeFunction::from_copy_closure_with_captures(assert_deep_equal, stringify);

    let assert = ObjectInitializer::new(context)
        .function(NativeFunction::from_fn_ptr(assert_equal), js_string!("equal"), 3)
        .function(deep_equal, js_string!("deepEqual"), 3)
        .function(NativeFunction::from_fn_ptr(assert_ok), js_string!("ok"), 2)
        .function(NativeFunction::from_fn_ptr(assert_not_equal), js_string!("notEqual"), 3)
        .build();
    context.register_global_property(js_string!("assert"), assert, read_only())
}

fn register_console(context: &mut Context) -> JsResult<()> {
    let console = ObjectInitializer::new(context)
        .function(console_fn(ScriptLevel::Info), js_string!("log"), 0)
        .function(console_fn(ScriptLevel::Info), js_string!("info"), 0)
        .function(console_fn(ScriptLevel::Warn), js_string!("warn"), 0)
        .function(console_fn(ScriptLevel::Error), js_string!("error"), 0)
        .function(console_fn(ScriptLevel::Debug), js_string!("debug"), 0)
        .build();
    context.register_global_property(js_string!("console"), console, read_only())?;

    let log = console_fn(ScriptLevel::Info).to_js_function(context.realm());
    context.register_global_property(js_string!("log"), log, read_only())
}

fn arg(args: &[JsValue], index: usize) -> JsValue {
    args.get(index).cloned().unwrap_or_default()
}

/// Text of a value as it would appear in a message.
pub(crate) fn describe(value: &JsValue, context: &mut Context) -> String {
    if let Some(s) = value.as_string() {
        return s.to_std_string_escaped();
    }
    match value.to_json(context) {
        Ok(json) => json.to_string(),
        Err(_) => value.display().to_string(),
    }
}

fn fail(args: &[JsValue], message_index: usize, default: String, context: &mut Context) -> JsError {
    let custom = args.get(message_index).filter(|v| !v.is_undefined());
    let message = match custom {
        Some(value) => describe(value, context),
        None => default,
    };
    JsNativeError::error()
        .with_message(message)
        .into()
}

fn assert_equal(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let (actual, expected) = (arg(args, 0), arg(args, 1));
    if actual.strict_equals(&expected) {
        return Ok(JsValue::undefined());
    }
    let default = format!(
        "Expected {} to equal {}",
        describe(&actual, context),
        describe(&expected, context)
    );
    Err(fail(args, 2, default, context))
}

fn assert_not_equal(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let (actual, expected) = (arg(args, 0), arg(args, 1));
    if !actual.strict_equals(&expected) {
        return Ok(JsValue::undefined());
    }
    let default = format!(
        "Expected {} to not equal {}",
        describe(&actual, context),
        describe(&expected, context)
    );
    Err(fail(args, 2, default, context))
}

fn assert_deep_equal(
    _this: &JsValue,
    args: &[JsValue],
    stringify: &JsObject,
    context: &mut Context,
) -> JsResult<JsValue> {
    let actual = stringify.call(&JsValue::undefined(), &[arg(args, 0)], context)?;
    let expected = stringify.call(&JsValue::undefined(), &[arg(args, 1)], context)?;
    // `undefined` has no JSON form and stringifies to `undefined` itself.
    if actual.strict_equals(&expected) {
        return Ok(JsValue::undefined());
    }
    let default = format!(
        "Expected {} to deeply equal {}",
        describe(&actual, context),
        describe(&expected, context)
    );
    Err(fail(args, 2, default, context))
}

fn assert_ok(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let value = arg(args, 0);
    if value.to_boolean() {
        return Ok(JsValue::undefined());
    }
    let default = format!("Expected {} to be truthy", describe(&value, context));
    Err(fail(args, 1, default, context))
}

#[derive(Debug, Clone, Copy)]
enum ScriptLevel {
    Debug,
    Info,
    Warn,
    Error,
}

fn console_fn(level: ScriptLevel) -> NativeFunction {
    NativeFunction::from_copy_closure(move |_this, args, ctx| {
        let line = args
            .iter()
            .map(|v| describe(v, ctx))
            .collect::<Vec<_>>()
            .join(" ");
        match level {
            ScriptLevel::Debug => tracing::debug!(target: SCRIPT_LOG_TARGET, "{line}"),
            ScriptLevel::Info => tracing::info!(target: SCRIPT_LOG_TARGET, "{line}"),
            ScriptLevel::Warn => tracing::warn!(target: SCRIPT_LOG_TARGET, "{line}"),
            ScriptLevel::Error => tracing::error!(target: SCRIPT_LOG_TARGET, "{line}"),
        }
        Ok(JsValue::undefined())
    })
}

/// Best message for a thrown value: the `message` of error objects, else its string form.
pub fn error_message(err: &JsError, context: &mut Context) -> String {
    if let Some(native) = err.as_native() {
        if matches!(native.kind, JsNativeErrorKind::RuntimeLimit) {
            return format!("Script aborted: {native}");
        }
    }
    let value = err.to_opaque(context);
    if let Some(object) = value.as_object() {
        if let Ok(message) = object.get(js_string!("message"), context) {
            if !message.is_undefined() {
                return describe(&message, context);
            }
        }
    }
    describe(&value, context)
}
