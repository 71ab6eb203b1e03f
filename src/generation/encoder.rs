//! Type-directed value encoder
//!
//! Turns an untyped JSON literal into Go source text that constructs the same
//! value for a given [`ShapeRef`]. The walk is a structural recursion over the
//! shape and the literal in lock step; a `$`-rooted path into the literal is
//! carried along so mismatches point at the offending element.
//!
//! ```
//! use serde_json::json;
//! use smokegen::generation::encoder::encode;
//! use smokegen::model::{Shape, ShapeRef};
//!
//! let keys = ShapeRef::new(Shape::List {
//!     member: Box::new(ShapeRef::boxed(Shape::String)),
//! });
//! let text = encode(&json!(["a"]), &keys, "s3").unwrap();
//! assert_eq!(text, "[]*string{\n\taws.String(\"a\"),\n}");
//! ```

use chrono::DateTime;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core::error::{Error, Result};
use crate::generation::utils::{go_string_literal, indent, json_kind};
use crate::model::{Member, Shape, ShapeRef};

/// Builds Go literal-construction text for shapes of one service package
#[derive(Debug, Clone)]
pub struct ShapeValueBuilder<'a> {
    package: &'a str,
    base_indent: usize,
}

impl<'a> ShapeValueBuilder<'a> {
    pub fn new(package: &'a str) -> Self {
        Self {
            package,
            base_indent: 0,
        }
    }

    /// Indentation depth of the line the literal starts on
    pub fn with_base_indent(mut self, depth: usize) -> Self {
        self.base_indent = depth;
        self
    }

    /// Go type text for a shape reference, e.g. `[]*string` or `*s3.Tag`
    pub fn go_type(&self, shape_ref: &ShapeRef) -> String {
        let base = match &shape_ref.shape {
            Shape::String | Shape::Enum { .. } => "string".to_string(),
            Shape::Integer => "int64".to_string(),
            Shape::Float => "float64".to_string(),
            Shape::Boolean => "bool".to_string(),
            Shape::Timestamp => "time.Time".to_string(),
            Shape::List { member } => return format!("[]{}", self.go_type(member)),
            Shape::Map { value, .. } => return format!("map[string]{}", self.go_type(value)),
            Shape::Structure { name, .. } => format!("{}.{}", self.package, name),
        };

        if shape_ref.boxed {
            format!("*{base}")
        } else {
            base
        }
    }

    /// Encodes `value` against `shape_ref`
    pub fn encode(&self, value: &JsonValue, shape_ref: &ShapeRef) -> Result<String> {
        self.encode_value(value, &shape_ref.shape, shape_ref.boxed, "$", self.base_indent)
    }

    /// Encodes an operation's input literal as `&pkg.Input{...}`.
    ///
    /// The input is always passed by address, whatever the reference says, and a
    /// `null` input means "no parameters".
    pub fn encode_input(&self, value: &JsonValue, input: &ShapeRef) -> Result<String> {
        if !matches!(input.shape, Shape::Structure { .. }) {
            return Err(Error::mismatch("$", "structure input shape", input.shape.kind()));
        }

        let empty = JsonValue::Object(JsonMap::new());
        let value = if value.is_null() { &empty } else { value };
        self.encode_value(value, &input.shape, true, "$", self.base_indent)
    }

    fn encode_value(
        &self,
        value: &JsonValue,
        shape: &Shape,
        boxed: bool,
        path: &str,
        depth: usize,
    ) -> Result<String> {
        if value.is_null() {
            let nil_able = boxed || matches!(shape, Shape::List { .. } | Shape::Map { .. });
            return if nil_able {
                Ok("nil".to_string())
            } else {
                Err(Error::mismatch(path, format!("non-null {}", shape.kind()), "null"))
            };
        }

        match shape {
            Shape::String => {
                let s = expect_str(value, path, "string")?;
                Ok(box_scalar("aws.String", go_string_literal(s), boxed))
            }
            Shape::Enum { values } => {
                let s = expect_str(value, path, "enum string")?;
                if !values.is_empty() && !values.iter().any(|v| v == s) {
                    return Err(Error::mismatch(
                        path,
                        format!("one of {values:?}"),
                        format!("{s:?}"),
                    ));
                }
                Ok(box_scalar("aws.String", go_string_literal(s), boxed))
            }
            Shape::Integer => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| Error::mismatch(path, "integer", describe(value)))?;
                Ok(box_scalar("aws.Int64", n.to_string(), boxed))
            }
            Shape::Float => match value {
                JsonValue::Number(n) => Ok(box_scalar("aws.Float64", n.to_string(), boxed)),
                other => Err(Error::mismatch(path, "number", json_kind(other))),
            },
            Shape::Boolean => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| Error::mismatch(path, "boolean", json_kind(value)))?;
                Ok(box_scalar("aws.Bool", b.to_string(), boxed))
            }
            Shape::Timestamp => {
                let literal = timestamp_literal(value, path)?;
                Ok(box_scalar("aws.Time", literal, boxed))
            }
            Shape::List { member } => {
                let items = value
                    .as_array()
                    .ok_or_else(|| Error::mismatch(path, "array", json_kind(value)))?;
                let mut elems = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    elems.push(self.encode_value(
                        item,
                        &member.shape,
                        member.boxed,
                        &item_path,
                        depth + 1,
                    )?);
                }
                let ty = format!("[]{}", self.go_type(member));
                Ok(composite(&ty, &elems, depth))
            }
            Shape::Map { key, value: elem } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| Error::mismatch(path, "object", json_kind(value)))?;
                if !matches!(key.shape, Shape::String | Shape::Enum { .. }) {
                    return Err(Error::mismatch(
                        path,
                        "map with string keys",
                        format!("{} keys", key.shape.kind()),
                    ));
                }

                let mut entries = Vec::with_capacity(object.len());
                for (k, v) in object {
                    let entry_path = format!("{path}[{k:?}]");
                    let key_text = self.encode_value(
                        &JsonValue::String(k.clone()),
                        &key.shape,
                        false,
                        &entry_path,
                        depth + 1,
                    )?;
                    let value_text =
                        self.encode_value(v, &elem.shape, elem.boxed, &entry_path, depth + 1)?;
                    entries.push(format!("{key_text}: {value_text}"));
                }
                let ty = format!("map[string]{}", self.go_type(elem));
                Ok(composite(&ty, &entries, depth))
            }
            Shape::Structure { name, members } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| Error::mismatch(path, "object", json_kind(value)))?;
                let fields = self.encode_fields(object, name, members, path, depth)?;
                let ty = format!("{}.{}", self.package, name);
                let literal = composite(&ty, &fields, depth);
                Ok(if boxed { format!("&{literal}") } else { literal })
            }
        }
    }

    /// Encodes struct fields in member declaration order
    fn encode_fields(
        &self,
        object: &JsonMap<String, JsonValue>,
        shape_name: &str,
        members: &[Member],
        path: &str,
        depth: usize,
    ) -> Result<Vec<String>> {
        if let Some(unknown) = object
            .keys()
            .find(|k| !members.iter().any(|m| &m.name == *k))
        {
            return Err(Error::UnknownField {
                path: path.to_string(),
                field: unknown.clone(),
                shape: shape_name.to_string(),
            });
        }

        let mut fields = Vec::new();
        for member in members {
            let Some(v) = object.get(&member.name) else {
                continue;
            };
            let field_path = format!("{path}.{}", member.name);
            let text = self.encode_value(
                v,
                &member.target.shape,
                member.target.boxed,
                &field_path,
                depth + 1,
            )?;
            fields.push(format!("{}: {text}", member.exported_name()));
        }
        Ok(fields)
    }
}

/// Encodes `value` against `shape_ref` for the given service package
pub fn encode(value: &JsonValue, shape_ref: &ShapeRef, package: &str) -> Result<String> {
    ShapeValueBuilder::new(package).encode(value, shape_ref)
}

fn expect_str<'v>(value: &'v JsonValue, path: &str, expected: &str) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| Error::mismatch(path, expected, json_kind(value)))
}

fn describe(value: &JsonValue) -> String {
    match value {
        JsonValue::Number(n) => format!("number {n}"),
        other => json_kind(other).to_string(),
    }
}

fn box_scalar(helper: &str, literal: String, boxed: bool) -> String {
    if boxed {
        format!("{helper}({literal})")
    } else {
        literal
    }
}

/// `Type{\n\telem,\n}` with one element per line; `Type{}` when empty
fn composite(ty: &str, elems: &[String], depth: usize) -> String {
    if elems.is_empty() {
        return format!("{ty}{{}}");
    }

    let inner = indent(depth + 1);
    let mut out = format!("{ty}{{\n");
    for elem in elems {
        out.push_str(&inner);
        out.push_str(elem);
        out.push_str(",\n");
    }
    out.push_str(&indent(depth));
    out.push('}');
    out
}

/// Epoch seconds or an RFC 3339 string as `time.Unix(secs, nanos)`
fn timestamp_literal(value: &JsonValue, path: &str) -> Result<String> {
    let (secs, nanos) = match value {
        JsonValue::Number(n) => {
            if let Some(secs) = n.as_i64() {
                (secs, 0)
            } else {
                let f = n
                    .as_f64()
                    .ok_or_else(|| Error::mismatch(path, "epoch seconds", format!("number {n}")))?;
                let secs = f.floor();
                // i64::MAX as f64 rounds up to 2^63
                if !f.is_finite() || secs < i64::MIN as f64 || secs >= i64::MAX as f64 {
                    return Err(Error::mismatch(
                        path,
                        "epoch seconds in int64 range",
                        format!("number {n}"),
                    ));
                }
                let nanos = ((f - secs) * 1e9).round() as i64;
                (secs as i64, nanos.min(999_999_999))
            }
        }
        JsonValue::String(s) => {
            let parsed = DateTime::parse_from_rfc3339(s)
                .map_err(|_| Error::mismatch(path, "RFC 3339 timestamp", format!("{s:?}")))?;
            (parsed.timestamp(), i64::from(parsed.timestamp_subsec_nanos()))
        }
        other => {
            return Err(Error::mismatch(path, "timestamp", json_kind(other)));
        }
    };

    Ok(format!("time.Unix({secs}, {nanos})"))
}
