use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use super::{CommandError, CommandResult};
use crate::ai::{self, GatewayResponse, NarrativeRequest, NarrativeService, SupportedLanguage};
use crate::error::StoreError;

/// One-shot questions for the text service, one per assistant tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskKind {
    /// Explain a medical report in plain language.
    Report,
    /// Cheaper alternatives for a named medicine.
    Alternatives,
    /// Translate medical jargon.
    Simplify,
    Chat,
}

impl AskKind {
    pub const ALL: &'static [AskKind] = &[Self::Report, Self::Alternatives, Self::Simplify, Self::Chat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Alternatives => "alternatives",
            Self::Simplify => "simplify",
            Self::Chat => "chat",
        }
    }

    pub fn request(&self, text: &str, language: SupportedLanguage) -> NarrativeRequest {
        match self {
            Self::Report => ai::medical_report_analysis(text, language),
            Self::Alternatives => ai::medicine_alternatives(text, language),
            Self::Simplify => ai::simplify_jargon(text, language),
            Self::Chat => ai::chatbot(text, language),
        }
    }
}

impl FromStr for AskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tool '{s}' (expected report, alternatives, simplify or chat)"))
    }
}

/// Question text from the argument, or from `file` when given
/// (report text is usually pasted from a document).
pub fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String, CommandError> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => text.unwrap_or_default(),
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::required("text").into());
    }
    Ok(text.to_string())
}

/// Sends the question and prints the reply. With `json`, prints the
/// gateway response document instead of bare text.
pub fn ask(
    service: &dyn NarrativeService,
    kind: AskKind,
    text: &str,
    language: SupportedLanguage,
    json: bool,
    out: &mut impl Write,
) -> CommandResult {
    let request = kind.request(text, language);
    let response = GatewayResponse::from(service.complete(&request));
    tracing::debug!(tool = kind.as_str(), success = response.success, "Ask finished");

    if json {
        let doc = serde_json::to_string_pretty(&response)
            .map_err(|e| StoreError::serialization("gatewayResponse", e))?;
        writeln!(out, "{doc}")?;
        return Ok(());
    }
    match (response.data, response.error) {
        (Some(data), _) => writeln!(out, "{data}")?,
        (None, error) => writeln!(out, "{}", error.unwrap_or_default())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockNarrativeService, GENERATION_FAILED_MESSAGE};

    fn run<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> CommandResult,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Report".parse::<AskKind>().unwrap(), AskKind::Report);
        assert_eq!(" chat ".parse::<AskKind>().unwrap(), AskKind::Chat);
        assert!("diagnose".parse::<AskKind>().unwrap_err().contains("diagnose"));
    }

    #[test]
    fn each_tool_uses_its_template() {
        let service = MockNarrativeService::new("ok");
        for kind in AskKind::ALL {
            run(|out| ask(&service, *kind, "Paracetamol", SupportedLanguage::Tamil, false, out));
        }
        let calls = service.calls();
        assert!(calls[0].prompt_text.contains("analyze this medical report"));
        assert!(calls[1].prompt_text.contains("cheaper alternatives for the medicine \"Paracetamol\""));
        assert!(calls[2].system_preamble.contains("medical translator"));
        assert!(calls[3].prompt_text.starts_with("User: Paracetamol"));
        assert!(calls.iter().all(|c| c.target_language == SupportedLanguage::Tamil));
    }

    #[test]
    fn prints_reply_text() {
        let service = MockNarrativeService::new("## Generic options\nAcetaminophen");
        let text = run(|out| {
            ask(&service, AskKind::Alternatives, "Crocin", SupportedLanguage::English, false, out)
        });
        assert_eq!(text, "## Generic options\nAcetaminophen\n");
    }

    #[test]
    fn failure_prints_generic_message() {
        let text = run(|out| {
            ask(
                &MockNarrativeService::failing(),
                AskKind::Chat,
                "headache",
                SupportedLanguage::English,
                false,
                out,
            )
        });
        assert_eq!(text.trim(), GENERATION_FAILED_MESSAGE);
    }

    #[test]
    fn json_output_is_gateway_response() {
        let text = run(|out| {
            ask(
                &MockNarrativeService::new("Hypertension means high blood pressure."),
                AskKind::Simplify,
                "hypertension",
                SupportedLanguage::English,
                true,
                out,
            )
        });
        let response: GatewayResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(response, GatewayResponse::ok("Hypertension means high blood pressure."));

        let text = run(|out| {
            ask(
                &MockNarrativeService::failing(),
                AskKind::Simplify,
                "hypertension",
                SupportedLanguage::English,
                true,
                out,
            )
        });
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn input_from_file_or_argument() {
        let tmp = tempfile::tempdir().unwrap();
        let report = tmp.path().join("report.txt");
        std::fs::write(&report, "  HbA1c 7.2%\n").unwrap();
        assert_eq!(read_input(None, Some(&report)).unwrap(), "HbA1c 7.2%");
        assert_eq!(read_input(Some("aspirin".into()), None).unwrap(), "aspirin");

        let err = read_input(Some("   ".into()), None).unwrap_err();
        assert!(matches!(err, CommandError::Store(StoreError::Validation { .. })));
        let err = read_input(None, Some(&tmp.path().join("missing.txt"))).unwrap_err();
        assert!(matches!(err, CommandError::Io(_)));
    }
}
