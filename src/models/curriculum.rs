use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    Course, CourseType, RequisiteKind, SemesterKey, Term, units_from_value, value_to_string, year_from_value,
};

/// Cantidad de cursos de un tipo prescrita para un semestre concreto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrescribedCount {
    pub semester: SemesterKey,
    pub count: u32,
}

/// Cuota declarada por la malla para un tipo de curso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawQuota")]
pub struct QuotaDeclaration {
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub total: u32,
    pub prescribed: Vec<PrescribedCount>,
}

impl QuotaDeclaration {
    pub fn new(course_type: CourseType, total: u32) -> Self {
        QuotaDeclaration { course_type, total, prescribed: Vec::new() }
    }

    pub fn with_prescribed(mut self, semester: SemesterKey, count: u32) -> Self {
        self.prescribed.push(PrescribedCount { semester, count });
        self
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawQuota {
    #[serde(default, rename = "type", alias = "course_type")]
    course_type: Option<Value>,
    #[serde(default)]
    total: Option<Value>,
    #[serde(default)]
    prescribed: Option<Value>,
}

impl From<RawQuota> for QuotaDeclaration {
    fn from(raw: RawQuota) -> Self {
        let course_type = raw
            .course_type
            .as_ref()
            .map(|v| CourseType::parse(&value_to_string(v)))
            .unwrap_or(CourseType::Other);
        let total = count_from_value(raw.total.as_ref());

        // Acepta {"semester": "1-1", "count": n} o {"year": 1, "term": 1, "count": n}
        let prescribed = raw
            .prescribed
            .as_ref()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|p| {
                let obj = p.as_object()?;
                let semester = match obj.get("semester").and_then(|s| s.as_str()) {
                    Some(s) => SemesterKey::parse(s)?,
                    None => {
                        let year = obj.get("year").and_then(year_from_value).filter(|y| *y >= 1)?;
                        let term = obj.get("term").and_then(Term::from_value)?;
                        SemesterKey::new(year, term)
                    }
                };
                Some(PrescribedCount { semester, count: count_from_value(obj.get("count")) })
            })
            .collect();

        QuotaDeclaration { course_type, total, prescribed }
    }
}

fn count_from_value(v: Option<&Value>) -> u32 {
    units_from_value(v).floor().min(u32::MAX as f64) as u32
}

/// Definición de una malla: catálogo de cursos y cuotas por tipo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCurriculum")]
pub struct Curriculum {
    pub id: String,
    pub name: String,
    pub courses: Vec<Course>,
    pub quotas: Vec<QuotaDeclaration>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCurriculum {
    #[serde(default, alias = "_id")]
    id: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    courses: Option<Value>,
    #[serde(default)]
    quotas: Option<Value>,
}

/// Elementos de una lista JSON que se dejan parsear como `T`; lo demás se descarta.
fn parse_list<T: serde::de::DeserializeOwned>(v: Option<&Value>) -> Vec<T> {
    v.and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|item| T::deserialize(item).ok()).collect())
        .unwrap_or_default()
}

impl From<RawCurriculum> for Curriculum {
    fn from(raw: RawCurriculum) -> Self {
        Curriculum {
            id: raw.id.as_ref().map(value_to_string).unwrap_or_default(),
            name: raw.name.as_ref().map(value_to_string).unwrap_or_default(),
            courses: parse_list(raw.courses.as_ref()),
            quotas: parse_list(raw.quotas.as_ref()),
        }
    }
}

impl Curriculum {
    pub fn new(id: &str, name: &str) -> Self {
        Curriculum { id: id.to_string(), name: name.to_string(), ..Default::default() }
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn course_by_code(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Busca por id y, si no calza, por código.
    pub fn resolve(&self, key: &str) -> Option<&Course> {
        self.course(key).or_else(|| self.course_by_code(key))
    }

    pub fn declaration(&self, course_type: CourseType) -> Option<&QuotaDeclaration> {
        self.quotas.iter().find(|q| q.course_type == course_type)
    }

    /// Limpia el catálogo recién leído: descarta cursos sin id, ids repetidos
    /// (gana el primero) y completa el código de cada requisito desde el catálogo.
    /// Devuelve cuántos cursos se descartaron.
    pub fn normalize(&mut self) -> usize {
        let before = self.courses.len();
        let mut seen = std::collections::HashSet::new();
        self.courses.retain(|c| !c.id.is_empty() && seen.insert(c.id.clone()));

        let codes: HashMap<String, String> =
            self.courses.iter().map(|c| (c.id.clone(), c.code.clone())).collect();
        let ids_by_code: HashMap<String, String> =
            self.courses.iter().map(|c| (c.code.to_uppercase(), c.id.clone())).collect();
        for course in self.courses.iter_mut() {
            for req in course.requisites.iter_mut() {
                // requisitos escritos con el código del curso en vez del id
                if !codes.contains_key(&req.course_id) {
                    if let Some(id) = ids_by_code.get(&req.course_id.to_uppercase()) {
                        req.course_id = id.clone();
                    }
                }
                if req.code.is_none() {
                    req.code = codes.get(&req.course_id).cloned();
                }
            }
        }
        before - self.courses.len()
    }

    /// Ciclos entre prerequisitos del catálogo (cada ciclo como lista de códigos).
    pub fn requisite_cycles(&self) -> Vec<Vec<String>> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();
        for c in self.courses.iter() {
            node_map.insert(c.id.as_str(), graph.add_node(c.code.as_str()));
        }
        for c in self.courses.iter() {
            for req in c.requisites.iter().filter(|r| r.kind == RequisiteKind::Prerequisite) {
                if let (Some(&from), Some(&to)) = (node_map.get(req.course_id.as_str()), node_map.get(c.id.as_str())) {
                    if graph.find_edge(from, to).is_none() {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.find_edge(scc[0], scc[0]).is_some())
            .map(|scc| {
                let mut codes: Vec<String> = scc.iter().map(|n| graph[*n].to_string()).collect();
                codes.sort();
                codes
            })
            .collect();
        cycles.sort();
        cycles
    }
}
