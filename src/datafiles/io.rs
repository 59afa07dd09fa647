use calamine::Data;
use serde_json::Value;

/// Convierte un `Data` de calamine a String.
pub fn data_to_string(d: &Data) -> String {
    match d {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Convierte una celda a JSON conservando números y booleanos, para pasarla
/// por el mismo parseo tolerante que los datafiles JSON.
pub fn data_to_value(d: &Data) -> Value {
    match d {
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::from(*f as i64),
        Data::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Data::Int(i) => Value::from(*i),
        Data::Bool(b) => Value::Bool(*b),
        Data::Empty | Data::Error(_) => Value::Null,
        other => Value::String(data_to_string(other)),
    }
}

/// Normaliza encabezados eliminando espacios, guiones y pasando a minúsculas.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase().chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Divide una celda con lista ("CS101, CS102; MATH1") en elementos no vacíos.
pub fn split_list(s: &str) -> Vec<String> {
    s.split([',', ';', '\n'])
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_to_string() {
        assert_eq!(data_to_string(&Data::Float(3.0)), "3");
        assert_eq!(data_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(data_to_string(&Data::String("  CS101 ".into())), "CS101");
        assert_eq!(data_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_normalize_header_y_listas() {
        assert_eq!(normalize_header("Course Type"), "coursetype");
        assert_eq!(normalize_header("Pre-Requisites"), "prerequisites");
        assert_eq!(split_list("CS101, CS102;MATH1 ,"), vec!["CS101", "CS102", "MATH1"]);
        assert!(split_list("  ").is_empty());
    }
}
