//! Fixed, parameterized reporting queries
//!
//! Every report takes one free-text search term bound as `$1` and matched
//! with `ILIKE`. The built-in set targets the university schema the console
//! was first written for; config can add or override reports by id.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A named report query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    /// Prompt for the search term
    #[serde(default = "default_prompt")]
    pub prompt: String,
    pub sql: String,
}

fn default_prompt() -> String {
    "Search term".to_owned()
}

impl Report {
    /// `ILIKE` pattern matching `term` anywhere.
    pub fn pattern(term: &str) -> String {
        format!("%{}%", term)
    }
}

const LAB_SUPERVISORS: &str = r#"
SELECT
    doc."código"             AS codigo_docente,
    doc."nome"               AS nome_docente,
    lab."id"                 AS laboratorio_id,
    lab."nome"               AS laboratorio_nome,
    lab."sala"               AS sala,
    lab."prédio"             AS predio,
    drl."data"               AS data_responsabilidade
FROM "Docente" doc
JOIN "DocenteResponsávelPorLaboratório" drl
     ON doc."código" = drl."docenteCódigo"
JOIN "Laboratório" lab
     ON lab."id" = drl."laboratórioId"
WHERE doc."nome" ILIKE $1
ORDER BY doc."nome"
"#;

const LAB_EQUIPMENT: &str = r#"
SELECT
    lab."id"                 AS laboratorio_id,
    lab."nome"               AS laboratorio_nome,
    eqp."nTombamento"        AS tombamento,
    eqp."nome"               AS nome_equipamento,
    eqp."fabricante"         AS fabricante,
    eqp."nModelo"            AS numero_modelo
FROM "Laboratório" lab
JOIN "Equipamento" eqp
     ON lab."id" = eqp."laboratórioId"
WHERE lab."nome" ILIKE $1
ORDER BY lab."nome", eqp."nTombamento"
"#;

const PROJECT_GRANTS: &str = r#"
SELECT
    p."código"            AS projeto_codigo,
    p."nome"              AS projeto_nome,
    mbp."id"              AS membro_id,
    mbp."função"          AS funcao,
    mbp."cargaHoraria"    AS carga_horaria,
    b."valor"             AS valor_bolsa,
    b."dataInicio"        AS bolsa_inicio,
    b."dataFim"           AS bolsa_fim
FROM "Projeto" p
JOIN "MembroDoProjeto" mbp
     ON p."código" = mbp."projetoCódigo"
LEFT JOIN "Bolsa" b
     ON b."bolsistaId" = mbp."id"
     AND b."projetoCódigo" = p."código"
WHERE p."nome" ILIKE $1
ORDER BY p."nome", mbp."id"
"#;

const STUDENT_ASSESSMENTS: &str = r#"
SELECT
    di."matrícula"          AS matricula,
    di."nome"               AS nome_discente,
    av."disciplinaNome"     AS disciplina,
    av."data"               AS data_avaliacao,
    av."valor"              AS valor_prova,
    dfa."nota"              AS nota_obtida
FROM "Discente" di
JOIN "DiscenteFazAvaliação" dfa
     ON di."matrícula" = dfa."matrícula"
JOIN "Avaliação" av
     ON av."disciplinaNome" = dfa."disciplinaNome"
    AND av."número"         = dfa."número"
    AND av."anoSemestre"    = dfa."anoSemestre"
    AND av."data"           = dfa."data"
WHERE di."nome" ILIKE $1
ORDER BY di."nome", av."data"
"#;

const STUDENT_PROJECTS: &str = r#"
SELECT
    di."matrícula",
    di."nome"               AS nome_discente,
    pj."código"            AS projeto_codigo,
    pj."nome"              AS projeto_nome,
    mbp."id"               AS membro_id,
    mbp."função"           AS funcao,
    mbp."cargaHoraria"     AS carga_horaria
FROM "Discente" di
JOIN "MembroDoProjeto" mbp
     ON di."membroDoProjetoId" = mbp."id"
JOIN "Projeto" pj
     ON mbp."projetoCódigo" = pj."código"
WHERE di."nome" ILIKE $1
ORDER BY di."nome", pj."nome"
"#;

/// (id, title, prompt, sql)
const BUILTIN: [(&str, &str, &str, &str); 5] = [
    (
        "lab-supervisors",
        "Faculty responsible for laboratories",
        "Part of the faculty member's name",
        LAB_SUPERVISORS,
    ),
    (
        "lab-equipment",
        "Equipment by laboratory",
        "Part of the laboratory name",
        LAB_EQUIPMENT,
    ),
    (
        "project-grants",
        "Project members and grants",
        "Part of the project name",
        PROJECT_GRANTS,
    ),
    (
        "student-assessments",
        "Assessments taken by a student",
        "Part of the student's name",
        STUDENT_ASSESSMENTS,
    ),
    (
        "student-projects",
        "Students participating in projects",
        "Part of the student's name",
        STUDENT_PROJECTS,
    ),
];

/// Ordered set of available reports
#[derive(Debug, Clone, Default)]
pub struct ReportCatalog {
    reports: Vec<Report>,
}

impl ReportCatalog {
    pub fn builtin() -> Self {
        let reports = BUILTIN
            .iter()
            .map(|(id, title, prompt, sql)| Report {
                id: (*id).to_owned(),
                title: (*title).to_owned(),
                prompt: (*prompt).to_owned(),
                sql: sql.trim().to_owned(),
            })
            .collect();
        Self { reports }
    }

    /// Built-ins plus `extra`. An extra report with a built-in id replaces
    /// it in place; new ids are appended.
    pub fn with_extra(extra: impl IntoIterator<Item = Report>) -> Self {
        let mut catalog = Self::builtin();
        for report in extra {
            match catalog.reports.iter_mut().find(|r| r.id == report.id) {
                Some(slot) => *slot = report,
                None => catalog.reports.push(report),
            }
        }
        catalog
    }

    pub fn get(&self, id: &str) -> Result<&Report> {
        self.reports
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CoreError::UnknownReport { id: id.to_owned() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_reports_take_one_parameter() {
        let catalog = ReportCatalog::builtin();
        assert_eq!(catalog.len(), 5);
        for report in catalog.iter() {
            assert!(report.sql.contains("ILIKE $1"), "{}", report.id);
            assert!(!report.sql.contains("$2"), "{}", report.id);
            assert!(!report.sql.ends_with(';'));
        }
    }

    #[test]
    fn pattern_wraps_term() {
        assert_eq!(Report::pattern("Silva"), "%Silva%");
        assert_eq!(Report::pattern(""), "%%");
    }

    #[test]
    fn unknown_report() {
        let err = ReportCatalog::builtin().get("nope").unwrap_err();
        assert_eq!(err, CoreError::UnknownReport { id: "nope".into() });
    }

    #[test]
    fn extra_reports_override_and_append() {
        let catalog = ReportCatalog::with_extra([
            Report {
                id: "lab-equipment".into(),
                title: "Custom".into(),
                prompt: default_prompt(),
                sql: "SELECT 1 WHERE 'x' ILIKE $1".into(),
            },
            Report {
                id: "orders".into(),
                title: "Orders".into(),
                prompt: default_prompt(),
                sql: "SELECT * FROM orders WHERE ref ILIKE $1".into(),
            },
        ]);
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("lab-equipment").unwrap().title, "Custom");
        let ids: Vec<_> = catalog.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids[1], "lab-equipment");
        assert_eq!(ids[5], "orders");
    }
}
