//! Prompt construction for the dialogue oracle.
//!
//! Prompts are plain text built from an [`ExchangeContext`] captured at
//! admission, so building one never touches live session state.

use std::fmt::Write;

use heartquest_domain::{
    Affection, BehaviorDirective, ExchangeContext, InteractionRecord, NpcMood, PlayerAction,
};

/// Token cap for every oracle call.
pub const MAX_TOKENS: u32 = 512;

/// Number of past exchanges included in action prompts.
pub const RECENT_HISTORY: usize = 8;

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a game narrator and analyst.";

const PERSONA: &str = "\
You are Adrian, a handsome, intelligent, and charming man in your late 20s in a dating simulation game.

PERSONALITY:
- Confident but not arrogant, witty but kind
- Warm sense of humor, enjoys intellectual conversations
- Passionate about art, literature, and cooking
- Flirty when the mood is right, but not easy to win over
- Values authenticity, kindness, and genuine connection
- Dislikes dishonesty, superficiality, and overly aggressive behavior";

/// Band boundaries as shown to the oracle, paired with a sample score.
const BAND_RANGES: [(&str, i32); 4] = [("0-25", 0), ("26-60", 26), ("61-85", 61), ("86-100", 86)];

fn interaction_line(record: &InteractionRecord) -> String {
    format!(
        "- Player: {} -> Adrian ({}): \"{}\"",
        record.action_label, record.npc_mood, record.npc_dialogue
    )
}

fn mood_vocabulary() -> String {
    NpcMood::all()
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// System prompt for reacting to one player action.
pub fn action_system_prompt(ctx: &ExchangeContext, action: &PlayerAction) -> String {
    let mut prompt = String::with_capacity(3072);
    prompt.push_str(PERSONA);

    let mission = &ctx.mission;
    let _ = write!(
        prompt,
        "\n\nCURRENT STATE:\n\
         - Mission: \"{}\" - {}\n\
         - Scene: {}\n\
         - Current affection level: {}\n\
         - Current mood: {}\n",
        mission.title, mission.description, mission.scenario, ctx.affection, ctx.mood
    );
    if let Some(name) = &ctx.player_name {
        let _ = writeln!(prompt, "- The player's name is {name}");
    }

    prompt.push_str("\nRECENT INTERACTIONS:\n");
    let recent = ctx.recent_history(RECENT_HISTORY);
    if recent.is_empty() {
        prompt.push_str("(First interaction)\n");
    } else {
        for record in recent {
            prompt.push_str(&interaction_line(record));
            prompt.push('\n');
        }
    }

    if action.is_free_text() {
        let _ = write!(prompt, "\nTHE PLAYER JUST SAID: \"{}\"\n", action.label);
    } else {
        let _ = write!(prompt, "\nTHE PLAYER JUST PERFORMED THIS ACTION: \"{}\"\n", action.label);
    }

    prompt.push_str(
        "\nBEHAVIOR RULES:\n\
         - Respond naturally as Adrian would to this specific action\n\
         - Your dialogue should be 1-2 sentences, natural and in-character\n",
    );
    for (range, sample) in BAND_RANGES {
        let _ = writeln!(
            prompt,
            "- If affection is {range}: be {}",
            Affection::new(sample).band().guidance()
        );
    }
    let _ = writeln!(
        prompt,
        "- Consider the context: a \"{}\" action might be charming or awkward depending on timing",
        action.label
    );
    prompt.push_str("- If the same action is repeated too often, react with mild amusement or suggest variety\n");

    let directives = BehaviorDirective::all()
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join("/");
    let _ = write!(
        prompt,
        "\nRESPONSE FORMAT:\n\
         Respond ONLY with a JSON object (no markdown, no code blocks):\n\
         {{\"dialogue\": \"Your spoken response as Adrian\", \"mood\": \"one of: {}\", \
         \"affection_delta\": number between -10 and 10, \"npc_action\": \"one of: {}\"}}\n\
         \nnpc_action determines Adrian's physical reaction:\n",
        mood_vocabulary(),
        directives
    );
    for directive in BehaviorDirective::all() {
        let _ = writeln!(prompt, "- {}: {}", directive.as_str(), directive.meaning());
    }

    prompt
}

/// The single user turn that accompanies [`action_system_prompt`].
pub fn action_user_message(action: &PlayerAction) -> String {
    if action.is_free_text() {
        action.label.clone()
    } else {
        format!("*{}*", action.label)
    }
}

/// User message asking the narrator to grade the finished mission.
pub fn analysis_prompt(ctx: &ExchangeContext) -> String {
    let mission = &ctx.mission;
    let log = ctx
        .recent_history(RECENT_HISTORY)
        .iter()
        .map(interaction_line)
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = format!(
        "You are the game narrator analyzing a completed mission in a dating simulation.\n\n\
         MISSION: \"{}\" - {}\n\n\
         INTERACTIONS:\n{}\n\n\
         CURRENT AFFECTION LEVEL: {}\n",
        mission.title, mission.description, log, ctx.affection
    );
    if let Some(name) = &ctx.player_name {
        let _ = writeln!(prompt, "PLAYER NAME: {name}");
    }
    let _ = write!(
        prompt,
        "\nAnalyze the player's performance. Respond ONLY with a JSON object (no markdown, no code blocks):\n\
         {{\n  \"summary\": \"2-3 sentence narrative summary of how the interaction went\",\n  \
         \"affection_change\": number (-15 to +{}),\n  \
         \"npc_mood\": \"Adrian's mood after this mission ({})\",\n  \
         \"advice\": \"One sentence of advice for winning Adrian's heart in future missions\"\n}}\n\n\
         Be fair but not too generous. Reward genuine, varied interactions. Penalize repetitive or poorly-timed actions.",
        mission.target_affection_gain,
        mood_vocabulary()
    );
    prompt
}
