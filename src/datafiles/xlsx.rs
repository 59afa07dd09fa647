// Lectura de mallas desde planillas (.xlsx/.xls/.ods).
//
// Hoja `Courses` (o la primera) con fila de encabezados; hoja opcional `Quotas`.
// Cada fila se arma como objeto JSON y pasa por el mismo parseo tolerante
// que los datafiles JSON.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use serde_json::{Map, Value, json};

use crate::datafiles::CurriculumError;
use crate::datafiles::io::{data_to_string, data_to_value, normalize_header, split_list};
use crate::models::{Course, Curriculum, QuotaDeclaration};

const COURSES_SHEET: &str = "courses";
const QUOTAS_SHEET: &str = "quotas";

/// Índice de columnas por encabezado normalizado, aceptando sinónimos.
fn header_index(header: &[Data], fields: &[(&'static str, &[&str])]) -> HashMap<&'static str, usize> {
    let normalized: Vec<String> = header.iter().map(|h| normalize_header(&data_to_string(h))).collect();
    let mut idx = HashMap::new();
    for (field, aliases) in fields {
        if let Some(pos) = normalized.iter().position(|h| aliases.contains(&h.as_str())) {
            idx.insert(*field, pos);
        }
    }
    idx
}

const COURSE_FIELDS: &[(&str, &[&str])] = &[
    ("id", &["id", "courseid"]),
    ("code", &["code", "coursecode", "codigo"]),
    ("title", &["title", "name", "coursetitle", "nombre"]),
    ("units", &["units", "unit", "credits", "creditos"]),
    ("academic", &["academic", "isacademic"]),
    ("type", &["type", "coursetype", "tipo"]),
    ("year", &["year", "anio"]),
    ("term", &["term", "semester", "periodo"]),
    ("prerequisites", &["prerequisites", "prerequisite", "prereqs"]),
    ("corequisites", &["corequisites", "corequisite", "coreqs"]),
];

const QUOTA_FIELDS: &[(&str, &[&str])] = &[
    ("type", &["type", "coursetype", "tipo"]),
    ("total", &["total", "required", "requiredtotal"]),
    ("year", &["year", "anio"]),
    ("term", &["term", "semester", "periodo"]),
    ("count", &["count", "cantidad"]),
];

fn cell<'a>(row: &'a [Data], idx: &HashMap<&'static str, usize>, field: &str) -> Option<&'a Data> {
    idx.get(field).and_then(|i| row.get(*i))
}

/// Cursos desde filas (la primera es el encabezado). Filas sin id ni código se ignoran.
pub fn courses_from_rows(rows: &[Vec<Data>]) -> Vec<Course> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let idx = header_index(header, COURSE_FIELDS);

    body.iter()
        .filter_map(|row| {
            let mut obj = Map::new();
            for field in ["id", "code", "title", "units", "academic", "type", "year", "term"] {
                if let Some(d) = cell(row, &idx, field) {
                    obj.insert(field.to_string(), data_to_value(d));
                }
            }

            let mut requisites: Vec<Value> = Vec::new();
            for (field, kind) in [("prerequisites", "Prerequisite"), ("corequisites", "Corequisite")] {
                if let Some(d) = cell(row, &idx, field) {
                    for code in split_list(&data_to_string(d)) {
                        requisites.push(json!({"course_id": code, "kind": kind}));
                    }
                }
            }
            obj.insert("requisites".to_string(), Value::Array(requisites));

            let course: Course = serde_json::from_value(Value::Object(obj)).ok()?;
            if course.id.is_empty() { None } else { Some(course) }
        })
        .collect()
}

/// Cuotas desde filas. Una fila con año y periodo aporta un conteo prescrito;
/// una fila sin ellos declara el total del tipo.
pub fn quotas_from_rows(rows: &[Vec<Data>]) -> Vec<QuotaDeclaration> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let idx = header_index(header, QUOTA_FIELDS);

    // tipo -> (total, prescritos) en orden de aparición
    let mut order: Vec<String> = Vec::new();
    let mut acc: HashMap<String, (Value, Vec<Value>)> = HashMap::new();

    for row in body {
        let type_name = cell(row, &idx, "type").map(data_to_string).unwrap_or_default();
        if type_name.is_empty() {
            continue;
        }
        if !acc.contains_key(&type_name) {
            order.push(type_name.clone());
        }
        let entry = acc.entry(type_name).or_insert((Value::Null, Vec::new()));

        let year = cell(row, &idx, "year").map(data_to_value).unwrap_or(Value::Null);
        let term = cell(row, &idx, "term").map(data_to_value).unwrap_or(Value::Null);
        if year.is_null() || term.is_null() {
            if let Some(total) = cell(row, &idx, "total") {
                entry.0 = data_to_value(total);
            }
        } else {
            let count = cell(row, &idx, "count").map(data_to_value).unwrap_or(Value::Null);
            entry.1.push(json!({"year": year, "term": term, "count": count}));
        }
    }

    order
        .into_iter()
        .filter_map(|t| {
            let (total, prescribed) = acc.remove(&t)?;
            serde_json::from_value(json!({"type": t, "total": total, "prescribed": prescribed})).ok()
        })
        .collect()
}

fn sheet_rows(workbook: &mut Sheets<BufReader<File>>, name: &str) -> Result<Vec<Vec<Data>>, calamine::Error> {
    let range = workbook.worksheet_range(name)?;
    Ok(range.rows().map(|r| r.to_vec()).collect())
}

pub fn read_curriculum_workbook(path: &Path) -> Result<Curriculum, CurriculumError> {
    let wb_err = |source| CurriculumError::Workbook { path: path.to_path_buf(), source };
    let mut workbook = open_workbook_auto(path).map_err(wb_err)?;

    let sheet_names = workbook.sheet_names().to_owned();
    let find = |wanted: &str| sheet_names.iter().find(|n| normalize_header(n) == wanted).cloned();

    let courses_sheet = match find(COURSES_SHEET).or_else(|| sheet_names.first().cloned()) {
        Some(s) => s,
        None => return Ok(Curriculum::default()),
    };

    let mut curriculum = Curriculum::default();
    curriculum.courses = courses_from_rows(&sheet_rows(&mut workbook, &courses_sheet).map_err(wb_err)?);
    if let Some(quota_sheet) = find(QUOTAS_SHEET) {
        curriculum.quotas = quotas_from_rows(&sheet_rows(&mut workbook, &quota_sheet).map_err(wb_err)?);
    }

    tracing::debug!(
        path = %path.display(),
        sheet = %courses_sheet,
        courses = curriculum.courses.len(),
        quotas = curriculum.quotas.len(),
        "malla leída desde planilla"
    );
    Ok(curriculum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseType, RequisiteKind, SemesterKey, Term};

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_courses_from_rows() {
        let rows = vec![
            vec![s("Code"), s("Title"), s("Units"), s("Course Type"), s("Year"), s("Term"), s("Pre-requisites"), s("Corequisites")],
            vec![s("CS101"), s("Intro"), Data::Float(3.0), s("Major"), Data::Int(1), s("1"), Data::Empty, Data::Empty],
            vec![s("CS102"), s("Data Structures"), s("3"), s("Major"), Data::Float(1.0), s("2"), s("CS101"), s("CS102L")],
            vec![s("PE1"), s("PE"), Data::Float(2.0), s("Required Non-Academic"), Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            vec![Data::Empty, s("sin código"), Data::Float(3.0), s("Major"), Data::Empty, Data::Empty, Data::Empty, Data::Empty],
        ];
        let courses = courses_from_rows(&rows);
        assert_eq!(courses.len(), 3);

        let cs102 = &courses[1];
        assert_eq!(cs102.id, "CS102");
        assert_eq!(cs102.units, 3.0);
        assert_eq!(cs102.prescribed, Some(SemesterKey::new(1, Term::Second)));
        assert_eq!(cs102.requisites.len(), 2);
        assert_eq!(cs102.requisites[0].kind, RequisiteKind::Prerequisite);
        assert_eq!(cs102.requisites[1].kind, RequisiteKind::Corequisite);

        let pe = &courses[2];
        assert_eq!(pe.course_type, CourseType::RequiredNonAcademic);
        assert!(!pe.academic);
        assert_eq!(pe.prescribed, None);
    }

    #[test]
    fn test_quotas_from_rows() {
        let rows = vec![
            vec![s("Type"), s("Total"), s("Year"), s("Term"), s("Count")],
            vec![s("GE Elective"), Data::Float(4.0), Data::Empty, Data::Empty, Data::Empty],
            vec![s("GE Elective"), Data::Empty, Data::Float(1.0), s("1"), Data::Float(1.0)],
            vec![s("Major"), Data::Float(2.0), Data::Empty, Data::Empty, Data::Empty],
            vec![s("GE Elective"), Data::Empty, Data::Float(2.0), s("M"), Data::Float(2.0)],
        ];
        let quotas = quotas_from_rows(&rows);
        assert_eq!(quotas.len(), 2);
        assert_eq!(quotas[0].course_type, CourseType::GeElective);
        assert_eq!(quotas[0].total, 4);
        assert_eq!(quotas[0].prescribed.len(), 2);
        assert_eq!(quotas[0].prescribed[1].semester, SemesterKey::new(2, Term::Midyear));
        assert_eq!(quotas[1].course_type, CourseType::Major);
        assert!(quotas[1].prescribed.is_empty());
    }

    #[test]
    fn test_filas_vacias() {
        assert!(courses_from_rows(&[]).is_empty());
        assert!(quotas_from_rows(&[vec![s("Type")]]).is_empty());
    }
}
