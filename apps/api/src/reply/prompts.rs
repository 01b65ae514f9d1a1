//! Instruction prompt for the reply generation call.
//!
//! Request fields are interpolated verbatim — the model sees the tag values
//! exactly as the client sent them.

use crate::reply::models::{GenerateRequest, Intensity, TurnRole};

/// How many trailing turns are rendered into the prompt.
const PROMPT_TURNS: usize = 8;

/// Reply prompt. Replace `{relationship}`, `{scenario}`, `{tone}`,
/// `{target_gender}`, `{personalness}`, `{language_rule}`,
/// `{intensity_note}` and `{dialog}` before sending.
pub const REPLY_PROMPT_TEMPLATE: &str = r#"You are an AI assistant that helps craft short, natural-sounding messenger replies.
Context:
- Relationship type: {relationship}
- Scenario/goal: {scenario}
- Desired tone: {tone}
- Target gender (if any): {target_gender}
- Personalness (0=formal, 100=very personal): {personalness}
Rules:
- {language_rule}
- Max 2-3 sentences. Sound human, not robotic.
- Adapt to the emotional context; be concise and tactful.
- Add humor, empathy, or light flirt only if appropriate for scenario and relationship.
- Provide THREE stylistically distinct options:
  1) Confident & clear
  2) Friendly & warm
  3) Original with a tasteful twist (playful/flirty/clever - if appropriate)
Intensity adjuster: {intensity_note}
Recent conversation (latest last):
{dialog}
Return ONLY a single JSON object with keys: language (iso guess) and options=[{"label": "...", "text": "..."}, ...]. No markdown, no text outside the JSON object."#;

/// Renders the last turns as `Label: text` lines, oldest first.
pub fn format_dialog(request: &GenerateRequest) -> String {
    let start = request.messages.len().saturating_sub(PROMPT_TURNS);
    request.messages[start..]
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn language_rule(target_language: Option<&str>) -> String {
    match target_language {
        Some(code) => format!(
            "Reply ONLY in '{code}'. If the conversation mixes languages, \
             prefer the language of the partner's latest message."
        ),
        None => "Reply in the SAME LANGUAGE as the conversation.".to_string(),
    }
}

fn intensity_note(intensify: Option<Intensity>) -> &'static str {
    match intensify {
        None => "neutral baseline",
        Some(Intensity::Soften) => "make responses a little softer and gentler",
        Some(Intensity::Sharpen) => "make responses a little bolder and edgier (but still respectful)",
    }
}

/// Builds the single instruction string sent to the model. Pure; the target
/// language is whatever the caller resolved (explicit or detected).
pub fn build_prompt(request: &GenerateRequest, target_language: Option<&str>) -> String {
    let target_gender = request
        .target_gender
        .map(|g| g.as_str())
        .unwrap_or("unspecified");

    REPLY_PROMPT_TEMPLATE
        .replace("{relationship}", request.relationship.as_str())
        .replace("{scenario}", request.scenario.as_str())
        .replace("{tone}", request.tone.as_str())
        .replace("{target_gender}", target_gender)
        .replace("{personalness}", &request.personalness.to_string())
        .replace("{language_rule}", &language_rule(target_language))
        .replace("{intensity_note}", intensity_note(request.intensify))
        .replace("{dialog}", &format_dialog(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::models::{ChatTurn, Relationship, Scenario, Tone};

    fn turn(role: TurnRole, text: &str) -> ChatTurn {
        ChatTurn {
            role,
            text: text.to_string(),
        }
    }

    fn request(messages: Vec<ChatTurn>) -> GenerateRequest {
        GenerateRequest {
            messages,
            relationship: Relationship::Friend,
            scenario: Scenario::Apologize,
            tone: Tone::Friendly,
            language: None,
            target_gender: None,
            personalness: 70,
            intensify: None,
        }
    }

    #[test]
    fn test_dialog_maps_roles_to_labels() {
        let request = request(vec![
            turn(TurnRole::User, "sorry about yesterday"),
            turn(TurnRole::Counterpart, "it's fine"),
            turn(TurnRole::Other, "group says hi"),
        ]);

        assert_eq!(
            format_dialog(&request),
            "You: sorry about yesterday\nPartner: it's fine\nOther: group says hi"
        );
    }

    #[test]
    fn test_dialog_keeps_only_the_last_eight_turns() {
        let messages = (0..10)
            .map(|i| turn(TurnRole::User, &format!("msg {i}")))
            .collect();
        let dialog = format_dialog(&request(messages));

        assert_eq!(dialog.lines().count(), 8);
        assert!(dialog.starts_with("You: msg 2"));
        assert!(dialog.ends_with("You: msg 9"));
    }

    #[test]
    fn test_prompt_states_target_language_strictly() {
        let prompt = build_prompt(&request(vec![]), Some("it"));
        assert!(prompt.contains("Reply ONLY in 'it'"));
        assert!(prompt.contains("partner's latest message"));
    }

    #[test]
    fn test_prompt_without_language_asks_for_same_language() {
        let prompt = build_prompt(&request(vec![]), None);
        assert!(prompt.contains("Reply in the SAME LANGUAGE as the conversation."));
    }

    #[test]
    fn test_prompt_interpolates_tags_verbatim() {
        let mut req = request(vec![turn(TurnRole::Counterpart, "hey")]);
        req.personalness = 85;
        let prompt = build_prompt(&req, Some("en"));

        assert!(prompt.contains("- Relationship type: friend"));
        assert!(prompt.contains("- Scenario/goal: apologize"));
        assert!(prompt.contains("- Desired tone: friendly"));
        assert!(prompt.contains("- Target gender (if any): unspecified"));
        assert!(prompt.contains("- Personalness (0=formal, 100=very personal): 85"));
        assert!(prompt.contains("Partner: hey"));
    }

    #[test]
    fn test_intensity_notes() {
        let mut req = request(vec![]);
        assert!(build_prompt(&req, None).contains("Intensity adjuster: neutral baseline"));

        req.intensify = Some(Intensity::Soften);
        assert!(build_prompt(&req, None).contains("a little softer and gentler"));

        req.intensify = Some(Intensity::Sharpen);
        assert!(build_prompt(&req, None).contains("bolder and edgier (but still respectful)"));
    }

    #[test]
    fn test_prompt_demands_a_single_json_object() {
        let prompt = build_prompt(&request(vec![]), None);
        assert!(prompt.contains("Return ONLY a single JSON object"));
        assert!(prompt.contains(r#"options=[{"label": "...", "text": "..."}"#));
    }
}
