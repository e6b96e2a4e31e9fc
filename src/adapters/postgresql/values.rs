//! Conversions between PostgreSQL values and the exporter's value types
//!
//! Both directions dispatch on the column or parameter type name, so only
//! the types listed here are supported. Anything else is reported with a hint
//! to cast in the query.

use crate::core::transform::{parse_bool, BindValue};
use crate::domain::errors::TransformError;
use crate::domain::result::TransformResult;
use crate::domain::{ExporterError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Number, Value};
use tokio_postgres::types::{FromSql, ToSql, Type};
use tokio_postgres::Row;
use uuid::Uuid;

/// A parameter ready to be passed to `execute`
pub type BoxedParam = Box<dyn ToSql + Sync + Send>;

/// Convert every column of a row into JSON scalars
pub fn row_to_values(row: &Row) -> Result<Vec<Value>> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| column_value(row, idx, column.name(), column.type_()))
        .collect()
}

fn get<'a, T: FromSql<'a>>(row: &'a Row, idx: usize, name: &str) -> Result<Option<T>> {
    row.try_get::<_, Option<T>>(idx).map_err(|e| {
        ExporterError::Database(format!("Failed to read column '{name}': {e}"))
    })
}

fn column_value(row: &Row, idx: usize, name: &str, ty: &Type) -> Result<Value> {
    let value = match ty.name() {
        "bool" => get::<bool>(row, idx, name)?.map(Value::Bool),
        "int2" => get::<i16>(row, idx, name)?.map(Value::from),
        "int4" => get::<i32>(row, idx, name)?.map(Value::from),
        "int8" => get::<i64>(row, idx, name)?.map(Value::from),
        "float4" => get::<f32>(row, idx, name)?
            .and_then(|v| Number::from_f64(f64::from(v)))
            .map(Value::Number),
        "float8" => get::<f64>(row, idx, name)?
            .and_then(Number::from_f64)
            .map(Value::Number),
        "text" | "varchar" | "bpchar" | "name" | "char" => {
            get::<String>(row, idx, name)?.map(Value::String)
        }
        "json" | "jsonb" => get::<Value>(row, idx, name)?,
        "date" => get::<NaiveDate>(row, idx, name)?.map(|d| Value::String(d.to_string())),
        "timestamp" => get::<NaiveDateTime>(row, idx, name)?
            .map(|ts| Value::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
        "timestamptz" => get::<DateTime<Utc>>(row, idx, name)?
            .map(|ts| Value::String(ts.to_rfc3339())),
        "uuid" => get::<Uuid>(row, idx, name)?.map(|u| Value::String(u.to_string())),
        "numeric" => {
            return Err(ExporterError::Database(format!(
                "Column '{name}' is numeric; cast it to float8 or text in the query"
            )))
        }
        other => {
            return Err(ExporterError::Database(format!(
                "Column '{name}' has unsupported type '{other}'; cast it to text in the query"
            )))
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

fn invalid(value: &str, ty: &Type) -> TransformError {
    TransformError::InvalidParameter {
        value: value.to_string(),
        target: ty.name().to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, ty: &Type) -> TransformResult<T> {
    text.trim().parse().map_err(|_| invalid(text, ty))
}

fn parse_strict_bool(text: &str, ty: &Type) -> TransformResult<bool> {
    match text.trim().to_lowercase().as_str() {
        "no" | "false" | "f" | "0" => Ok(false),
        t if parse_bool(t) => Ok(true),
        _ => Err(invalid(text, ty)),
    }
}

fn null_param(ty: &Type) -> BoxedParam {
    match ty.name() {
        "bool" => Box::new(None::<bool>),
        "int2" => Box::new(None::<i16>),
        "int4" => Box::new(None::<i32>),
        "int8" => Box::new(None::<i64>),
        "float4" => Box::new(None::<f32>),
        "float8" => Box::new(None::<f64>),
        "json" | "jsonb" => Box::new(None::<Value>),
        "date" => Box::new(None::<NaiveDate>),
        "timestamp" => Box::new(None::<NaiveDateTime>),
        "timestamptz" => Box::new(None::<DateTime<Utc>>),
        "uuid" => Box::new(None::<Uuid>),
        _ => Box::new(None::<String>),
    }
}

fn bit_param(bit: bool, ty: &Type) -> TransformResult<BoxedParam> {
    let param: BoxedParam = match ty.name() {
        "bool" => Box::new(bit),
        "int2" => Box::new(i16::from(bit)),
        "int4" => Box::new(i32::from(bit)),
        "int8" => Box::new(i64::from(bit)),
        "text" | "varchar" | "bpchar" => Box::new(if bit { "1" } else { "0" }.to_string()),
        _ => return Err(invalid(if bit { "1" } else { "0" }, ty)),
    };
    Ok(param)
}

fn text_param(text: &str, ty: &Type) -> TransformResult<BoxedParam> {
    let param: BoxedParam = match ty.name() {
        "bool" => Box::new(parse_strict_bool(text, ty)?),
        "int2" => Box::new(parse_number::<i16>(text, ty)?),
        "int4" => Box::new(parse_number::<i32>(text, ty)?),
        "int8" => Box::new(parse_number::<i64>(text, ty)?),
        "float4" => Box::new(parse_number::<f32>(text, ty)?),
        "float8" => Box::new(parse_number::<f64>(text, ty)?),
        "json" | "jsonb" => {
            Box::new(serde_json::from_str::<Value>(text).map_err(|_| invalid(text, ty))?)
        }
        "date" => Box::new(
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| invalid(text, ty))?,
        ),
        "timestamp" => Box::new(parse_timestamp(text).ok_or_else(|| invalid(text, ty))?),
        "timestamptz" => Box::new(
            DateTime::parse_from_rfc3339(text.trim())
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|_| invalid(text, ty))?,
        ),
        "uuid" => Box::new(Uuid::parse_str(text.trim()).map_err(|_| invalid(text, ty))?),
        _ => Box::new(text.to_string()),
    };
    Ok(param)
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Convert a bind value into a parameter of the given PostgreSQL type
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameter`] when the text cannot be
/// parsed as the target type.
pub fn bind_param(value: &BindValue, ty: &Type) -> TransformResult<BoxedParam> {
    match value {
        BindValue::Null => Ok(null_param(ty)),
        BindValue::Bit(bit) => bit_param(*bit, ty),
        BindValue::Text(text) => text_param(text, ty),
    }
}

/// Convert a statement's values using the prepared statement's parameter types
pub fn bind_params(values: &[BindValue], types: &[Type]) -> TransformResult<Vec<BoxedParam>> {
    values
        .iter()
        .zip(types)
        .map(|(value, ty)| bind_param(value, ty))
        .collect()
}
