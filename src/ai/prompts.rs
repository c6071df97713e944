//! Prompt templates. Each builder returns a ready-to-send request; the
//! target language is woven into the preamble.

use super::{NarrativeRequest, SupportedLanguage};
use crate::models::{HealthProfile, Mood};

fn request(prompt_text: String, system_preamble: String, language: SupportedLanguage) -> NarrativeRequest {
    NarrativeRequest {
        prompt_text,
        system_preamble,
        target_language: language,
    }
}

/// Insights over the full profile, sent as pretty-printed JSON.
pub fn health_profile_analysis(profile: &HealthProfile, language: SupportedLanguage) -> NarrativeRequest {
    let profile_json = serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string());
    request(
        format!(
            "Please analyze this health profile and provide insights:\n\n\
{profile_json}\n\n\
Include:\n\
1. Overall health assessment\n\
2. Potential health risks based on the data\n\
3. Recommendations for improving health metrics\n\
4. Areas that look good and should be maintained\n\n\
Format the information in a clear, supportive way using Markdown for better readability."
        ),
        format!(
            "You are a helpful health assistant that analyzes health profiles and provides insights. \
Provide information in {language}."
        ),
        language,
    )
}

pub fn mood_support(mood: Mood, context: &str, language: SupportedLanguage) -> NarrativeRequest {
    request(
        format!(
            "The user has indicated they are feeling \"{mood}\". They provided this additional context: \"{context}\".\n\n\
Please provide:\n\
1. A validating, empathetic response acknowledging their feelings\n\
2. 1-2 gentle suggestions that might help with this mood\n\
3. A positive affirmation or encouraging message\n\n\
Keep the tone warm, supportive and non-judgmental. Format your response using Markdown for better readability."
        ),
        format!(
            "You are an empathetic mental health assistant. Provide supportive, kind responses to help users \
with their emotional wellbeing. Respond in {language}."
        ),
        language,
    )
}

pub fn medical_report_analysis(report_text: &str, language: SupportedLanguage) -> NarrativeRequest {
    request(
        format!(
            "Please analyze this medical report and explain it in simple, non-technical language:\n\n\
{report_text}\n\n\
Provide:\n\
1. A summary of key findings\n\
2. Any concerning issues that need attention\n\
3. Recommendations for follow-up\n\
4. Explanation of any medical terms used in the report\n\n\
Format your response using Markdown for better readability."
        ),
        format!(
            "You are a helpful medical assistant that analyzes medical reports and explains them in simple terms. \
Provide a clear summary of the medical findings, any concerning issues, and recommendations in {language}."
        ),
        language,
    )
}

pub fn medicine_alternatives(medicine_name: &str, language: SupportedLanguage) -> NarrativeRequest {
    request(
        format!(
            "Please suggest cheaper alternatives for the medicine \"{medicine_name}\".\n\n\
Include:\n\
1. Generic alternatives if available\n\
2. Similar medicines in the same class\n\
3. Approximate price comparisons\n\
4. Important notes about switching medications (e.g., consult doctor first)\n\n\
Format the information clearly using Markdown and make it easy to understand for someone without medical background."
        ),
        format!(
            "You are a helpful medical assistant that provides information about medicine alternatives. \
Provide information in {language}."
        ),
        language,
    )
}

pub fn simplify_jargon(medical_text: &str, language: SupportedLanguage) -> NarrativeRequest {
    request(
        format!(
            "Please explain the following medical terms or text in simple language:\n\n\
\"{medical_text}\"\n\n\
Break down any complex terms and explain what they mean in everyday language. \
Format your response using Markdown for better readability."
        ),
        format!(
            "You are a helpful medical translator that explains complex medical terms in simple language. \
Provide explanations in {language}."
        ),
        language,
    )
}

pub fn chatbot(user_input: &str, language: SupportedLanguage) -> NarrativeRequest {
    request(
        format!(
            "User: {user_input}\n\n\
Please provide a supportive, empathetic response and any relevant advice."
        ),
        format!(
            "You are an empathetic medical chatbot. Mention how your advice is not as good as a doctor \
and to consult a doctor for best diagnosis. Provide supportive, kind responses to help users \
with their symptoms or feelings. Respond in {language}."
        ),
        language,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_prompt_embeds_json() {
        let mut profile = HealthProfile::default();
        profile.personal_info.name = "Asha".into();
        let req = health_profile_analysis(&profile, SupportedLanguage::Hindi);
        assert!(req.prompt_text.contains("\"name\": \"Asha\""));
        assert!(req.prompt_text.contains("4. Areas that look good"));
        assert!(req.system_preamble.ends_with("Provide information in Hindi."));
        assert_eq!(req.target_language, SupportedLanguage::Hindi);
    }

    #[test]
    fn mood_prompt_quotes_mood_and_context() {
        let req = mood_support(Mood::Anxious, "exam tomorrow", SupportedLanguage::English);
        assert!(req
            .prompt_text
            .starts_with("The user has indicated they are feeling \"anxious\"."));
        assert!(req.prompt_text.contains("\"exam tomorrow\""));
        assert!(req.system_preamble.ends_with("Respond in English."));
    }

    #[test]
    fn chatbot_prompt_includes_disclaimer_request() {
        let req = chatbot("I have a headache", SupportedLanguage::Tamil);
        assert!(req.prompt_text.starts_with("User: I have a headache"));
        assert!(req.system_preamble.contains("consult a doctor"));
        assert!(req.system_preamble.ends_with("Respond in Tamil."));
    }

    #[test]
    fn other_templates_carry_their_input() {
        let lang = SupportedLanguage::Telugu;
        assert!(medical_report_analysis("HbA1c 7.2%", lang).prompt_text.contains("HbA1c 7.2%"));
        assert!(medicine_alternatives("Crocin", lang).prompt_text.contains("\"Crocin\""));
        assert!(simplify_jargon("tachycardia", lang).prompt_text.contains("\"tachycardia\""));
    }
}
