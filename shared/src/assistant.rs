//! Scripted first-aid assistant.
//!
//! Not an inference system: replies come from a fixed keyword table and the
//! urgency badge from two keyword lists. [`respond`] is pure; [`Conversation`]
//! only adds the message log and the "typing" delay.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{TimerId, TimerScope};
use crate::MAX_MESSAGE_LEN;

pub const GREETING: &str = "Hello! I'm your AI medical assistant. I can help with basic first aid \
guidance and medical information. Please describe your symptoms or situation, but remember that \
in case of severe emergency, call 911 immediately.";

pub const FALLBACK_REPLY: &str = "I understand you're concerned about your symptoms. While I can \
provide general first aid guidance, it's important to consult with a healthcare professional for \
proper diagnosis and treatment. Can you provide more specific details about what you're \
experiencing?";

struct Rule {
    keywords: &'static [&'static str],
    reply: &'static str,
}

// First match wins.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["chest pain", "heart"],
        reply: "⚠️ Chest pain can be serious. If you're experiencing severe chest pain, call 911 \
immediately. For mild discomfort: sit down, loosen tight clothing, take slow deep breaths. Do you \
have any heart medication prescribed? Are you also experiencing shortness of breath, nausea, or \
sweating?",
    },
    Rule {
        keywords: &["bleeding", "cut"],
        reply: "For bleeding wounds: 1) Apply direct pressure with a clean cloth 2) Elevate the \
injured area above heart level if possible 3) Don't remove objects embedded in deep wounds 4) If \
bleeding doesn't stop after 10 minutes of pressure, seek immediate medical attention. How severe \
is the bleeding?",
    },
    Rule {
        keywords: &["burn"],
        reply: "For burns: 1) Cool the burn with cool (not cold) running water for 10-20 minutes \
2) Remove jewelry/tight items before swelling 3) Don't use ice, butter, or ointments 4) Cover with \
sterile bandage. For large burns or burns on face/hands/genitals, seek immediate medical care. \
What caused the burn?",
    },
    Rule {
        keywords: &["fever", "temperature"],
        reply: "For fever management: 1) Stay hydrated with water/clear fluids 2) Rest 3) Use fever \
reducers like acetaminophen or ibuprofen as directed 4) Remove excess clothing 5) Seek medical \
attention if fever exceeds 103°F (39.4°C) or persists. Any other symptoms like severe headache, \
rash, or difficulty breathing?",
    },
];

const HIGH_URGENCY: &[&str] = &[
    "chest pain",
    "severe",
    "emergency",
    "blood",
    "unconscious",
    "breathing",
];

const MEDIUM_URGENCY: &[&str] = &["pain", "fever", "burn", "cut", "bleeding"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: &'static str,
    pub urgency: Urgency,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[must_use]
pub fn classify_urgency(input: &str) -> Urgency {
    let input = input.to_lowercase();
    if contains_any(&input, HIGH_URGENCY) {
        Urgency::High
    } else if contains_any(&input, MEDIUM_URGENCY) {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}

#[must_use]
pub fn respond(input: &str) -> AssistantReply {
    let lowered = input.to_lowercase();
    let text = RULES
        .iter()
        .find(|rule| contains_any(&lowered, rule.keywords))
        .map_or(FALLBACK_REPLY, |rule| rule.reply);

    AssistantReply {
        text,
        urgency: classify_urgency(input),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub sent_at_ms: u64,
    pub urgency: Option<Urgency>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssistantError {
    #[error("message is empty")]
    Blank,
    #[error("message is too long ({len} > {max})")]
    TooLong { len: usize, max: usize },
    #[error("still answering the previous message")]
    ReplyPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingReply {
    timer: TimerId,
    reply: AssistantReply,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_message_id: u64,
    next_timer_seq: u64,
    pending: Option<PendingReply>,
}

impl Conversation {
    #[must_use]
    pub fn new(now_ms: u64) -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_message_id: 0,
            next_timer_seq: 0,
            pending: None,
        };
        conversation.push(GREETING.to_string(), Sender::Assistant, now_ms, Some(Urgency::Low));
        conversation
    }

    fn push(&mut self, text: String, sender: Sender, now_ms: u64, urgency: Option<Urgency>) {
        self.next_message_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_message_id,
            text,
            sender,
            sent_at_ms: now_ms,
            urgency,
        });
    }

    /// Logs the user's message and returns the timer that will release the
    /// reply.
    pub fn submit(&mut self, text: &str, now_ms: u64) -> Result<TimerId, AssistantError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::Blank);
        }
        if text.len() > MAX_MESSAGE_LEN {
            return Err(AssistantError::TooLong {
                len: text.len(),
                max: MAX_MESSAGE_LEN,
            });
        }
        if self.pending.is_some() {
            return Err(AssistantError::ReplyPending);
        }

        self.push(text.to_string(), Sender::User, now_ms, None);

        self.next_timer_seq += 1;
        let timer = TimerId::new(TimerScope::Assistant, self.next_timer_seq);
        self.pending = Some(PendingReply {
            timer,
            reply: respond(text),
        });
        Ok(timer)
    }

    /// Appends the pending reply if `timer` is the one it waits on.
    pub fn deliver(&mut self, timer: TimerId, now_ms: u64) -> Option<&ChatMessage> {
        let pending = self.pending.filter(|p| p.timer == timer)?;
        self.pending = None;
        self.push(
            pending.reply.text.to_string(),
            Sender::Assistant,
            now_ms,
            Some(pending.reply.urgency),
        );
        self.messages.last()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub const fn is_typing(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(crate::get_current_time_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_match_in_order() {
        assert!(respond("I have CHEST PAIN").text.starts_with("⚠️ Chest pain"));
        assert!(respond("my heart is racing").text.starts_with("⚠️ Chest pain"));
        assert!(respond("deep cut on my hand").text.starts_with("For bleeding wounds"));
        assert!(respond("burned by the stove").text.starts_with("For burns"));
        assert!(respond("high temperature").text.starts_with("For fever"));
        // "bleeding" outranks "burn" because it comes first.
        assert!(respond("bleeding burn").text.starts_with("For bleeding wounds"));
    }

    #[test]
    fn unknown_input_gets_fallback() {
        assert_eq!(respond("my ankle twisted").text, FALLBACK_REPLY);
    }

    #[test]
    fn urgency_levels() {
        assert_eq!(classify_urgency("Severe headache"), Urgency::High);
        assert_eq!(classify_urgency("trouble breathing"), Urgency::High);
        assert_eq!(classify_urgency("there is blood"), Urgency::High);
        assert_eq!(classify_urgency("mild fever"), Urgency::Medium);
        assert_eq!(classify_urgency("back pain"), Urgency::Medium);
        assert_eq!(classify_urgency("feeling tired"), Urgency::Low);
    }

    #[test]
    fn conversation_starts_with_greeting() {
        let c = Conversation::new(0);
        assert_eq!(c.messages().len(), 1);
        assert_eq!(c.messages()[0].sender, Sender::Assistant);
        assert_eq!(c.messages()[0].text, GREETING);
        assert!(!c.is_typing());
    }

    #[test]
    fn submit_then_deliver() {
        let mut c = Conversation::new(0);
        let timer = c.submit("  I burned my finger ", 10).unwrap();
        assert!(c.is_typing());
        assert_eq!(c.messages()[1].text, "I burned my finger");
        assert_eq!(c.messages()[1].sender, Sender::User);

        let reply = c.deliver(timer, 1510).unwrap();
        assert!(reply.text.starts_with("For burns"));
        assert_eq!(reply.urgency, Some(Urgency::Medium));
        assert!(!c.is_typing());
        assert_eq!(c.messages().len(), 3);
    }

    #[test]
    fn rejects_blank_and_busy() {
        let mut c = Conversation::new(0);
        assert_eq!(c.submit("   ", 0), Err(AssistantError::Blank));

        let timer = c.submit("fever", 0).unwrap();
        assert_eq!(c.submit("again", 0), Err(AssistantError::ReplyPending));
        assert_eq!(c.messages().len(), 2);

        c.deliver(timer, 0);
        assert!(c.submit("again", 0).is_ok());
    }

    #[test]
    fn rejects_oversized_message() {
        let mut c = Conversation::new(0);
        let long = "a".repeat(MAX_MESSAGE_LEN + 1);
        assert!(matches!(c.submit(&long, 0), Err(AssistantError::TooLong { .. })));
    }

    #[test]
    fn wrong_timer_does_not_deliver() {
        let mut c = Conversation::new(0);
        let timer = c.submit("cut", 0).unwrap();
        let other = TimerId::new(TimerScope::Countdown, timer.seq);
        assert!(c.deliver(other, 0).is_none());
        assert!(c.is_typing());
    }
}
