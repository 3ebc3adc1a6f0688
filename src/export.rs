use crate::catalogue::Catalogue;
use crate::error::Result;
use crate::models::SelectionEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// auto-multiple-choice exam markup.
    Amc,
    /// Moodle LaTeX question bank markup.
    Moodle,
}

impl ExportFormat {
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Amc => "AMC",
            ExportFormat::Moodle => "Moodle",
        }
    }

    /// Renders one question. `vrai_correct` tells which option is the right one.
    pub fn render_block(self, identifier: usize, text: &str, vrai_correct: bool) -> String {
        match self {
            ExportFormat::Amc => {
                let (vrai, faux) = if vrai_correct {
                    ("\\bonne{Vrai}", "\\mauvaise{Faux}")
                } else {
                    ("\\mauvaise{Vrai}", "\\bonne{Faux}")
                };
                format!(
                    "{}\n\n\\begin{{responses}}\n{}\n{}\n\\end{{responses}}\n\n\n",
                    text, vrai, faux
                )
            }
            ExportFormat::Moodle => {
                let (vrai, faux) = if vrai_correct {
                    ("\\item* Vrai", "\\item Faux")
                } else {
                    ("\\item Vrai", "\\item* Faux")
                };
                format!(
                    "\\begin{{truefalse}}{{q-{}}}\n{}\n{}\n{}\n\\end{{truefalse}}\n\n\n",
                    identifier, text, vrai, faux
                )
            }
        }
    }

    /// `quiz-AMC-3,10,2.txt`
    pub fn file_name(self, identifiers: &[usize]) -> String {
        format!("quiz-{}-{}.txt", self.label(), join_identifiers(identifiers))
    }

    /// Name of the compilable document (preamble included).
    pub fn document_file_name(self, identifiers: &[usize]) -> String {
        format!("quiz-{}-{}.tex", self.label(), join_identifiers(identifiers))
    }
}

fn join_identifiers(identifiers: &[usize]) -> String {
    identifiers
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Concatenates the blocks of `entries`, in selection order.
///
/// The correct answer comes from the catalogue record of each entry.
pub fn render(format: ExportFormat, entries: &[SelectionEntry], catalogue: &Catalogue) -> Result<String> {
    let mut out = String::new();
    for entry in entries {
        let record = catalogue.require(entry.identifier)?;
        out.push_str(&format.render_block(
            entry.identifier,
            &record.text,
            record.first_answer_correct(),
        ));
    }
    Ok(out)
}

/// Preamble, questions, then `\end{document}`.
pub fn standalone_document(preamble: &str, body: &str) -> String {
    format!("{}{}\n\\end{{document}}", preamble, body)
}
