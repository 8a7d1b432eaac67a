pub const MAX_REPLIES: usize = 3;

const URGENT_PRIORITY: i32 = 7;
const LOW_PRIORITY: i32 = 4;

const URGENT_REPLIES: &[&str] = &[
    "I'm on it and will get back to you shortly.",
    "Received — treating this as a priority.",
];
const LOW_PRIORITY_REPLIES: &[&str] = &[
    "Thanks for the update.",
    "Noted, thank you.",
];
const MEETING_REPLIES: &[&str] = &[
    "The proposed time works for me.",
    "Let me check my calendar and confirm today.",
];
const TASK_REPLIES: &[&str] = &[
    "I'll take care of this and report back.",
];
const CONCERNED_REPLIES: &[&str] = &[
    "Sorry to hear about the trouble — I'm looking into it now.",
];
const POSITIVE_REPLIES: &[&str] = &[
    "Glad to hear it, thanks for letting me know!",
];
const DEFAULT_REPLY: &str = "Thanks for your email, I'll get back to you soon.";

/// Pick up to three canned replies from the fixed bank. Selection follows
/// bank order: priority tier, meeting, tasks, tone. Always returns at
/// least one suggestion.
pub fn suggest(priority: i32, has_meeting: bool, has_tasks: bool, tone: &str) -> Vec<String> {
    let mut replies: Vec<&str> = Vec::new();

    if priority >= URGENT_PRIORITY {
        replies.extend_from_slice(URGENT_REPLIES);
    } else if priority < LOW_PRIORITY {
        replies.extend_from_slice(LOW_PRIORITY_REPLIES);
    }
    if has_meeting {
        replies.extend_from_slice(MEETING_REPLIES);
    }
    if has_tasks {
        replies.extend_from_slice(TASK_REPLIES);
    }
    match tone {
        "concerned" => replies.extend_from_slice(CONCERNED_REPLIES),
        "positive" => replies.extend_from_slice(POSITIVE_REPLIES),
        _ => {}
    }
    if replies.is_empty() {
        replies.push(DEFAULT_REPLY);
    }

    replies.dedup();
    replies
        .into_iter()
        .take(MAX_REPLIES)
        .map(str::to_string)
        .collect()
}
