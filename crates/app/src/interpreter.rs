//! Command interpreter — keyword matching over lowercased free text.
//!
//! Matching precedence is part of the behavior contract and must not be
//! reordered: scheduling keywords first, then washing machine before the
//! air-conditioner (whose heuristics are deliberately loose), then light,
//! then security, then the free-form intents (log details, greeting, help,
//! status), then the fallback reply.

use chrono::Duration as ChronoDuration;

use homectl_domain::appliance::{ApplianceKind, SwitchState};
use homectl_domain::event::EventKind;
use homectl_domain::schedule::ScheduledTask;
use homectl_domain::time::{self, format_clock};

use crate::hub::Hub;
use crate::ports::{EventLog, PinDriver, StateStore};

/// Reply plus the optional broadcast notification a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretOutcome {
    pub reply: String,
    pub notification: Option<String>,
}

impl InterpretOutcome {
    fn reply_only(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            notification: None,
        }
    }
}

impl<D, S, L> Hub<D, S, L>
where
    D: PinDriver + Send + Sync,
    S: StateStore + Clone + Send + Sync,
    L: EventLog + Send + Sync,
{
    /// Interpret one command. Infallible: every path yields a reply.
    pub(crate) async fn interpret(
        &self,
        text: &str,
        user_name: &str,
        user_id: i64,
    ) -> InterpretOutcome {
        let lower = text.to_lowercase();

        if lower.contains("schedule") || lower.contains("timer") {
            return self.schedule_command(&lower, user_name).await;
        }

        if let Some(kind) = detect_appliance(&lower) {
            return match detect_action(&lower) {
                Some(action) => self.switch_command(kind, action, user_name, user_id).await,
                None => InterpretOutcome::reply_only(format!(
                    "{} {} is currently {}.",
                    kind.emoji(),
                    kind.display_name(),
                    state_word(self.registry.state_of(kind)),
                )),
            };
        }

        if mentions_security(&lower) {
            return self.security_command(&lower, user_name, user_id).await;
        }

        if lower.contains("log details") {
            return InterpretOutcome::reply_only(self.center.render_log_details().await);
        }
        if ["hello", "hi", "hey", "greetings"]
            .iter()
            .any(|word| lower.contains(word))
        {
            return InterpretOutcome::reply_only(format!(
                "Hello {user_name}! Welcome to homectl!"
            ));
        }
        if ["help", "what can you do", "commands"]
            .iter()
            .any(|word| lower.contains(word))
        {
            return InterpretOutcome::reply_only(format!(
                "Hello {user_name}! I can help you control your home appliances and security \
                 system! Try commands like 'Turn on the light', 'Turn off the AC', 'Initialize \
                 security system', or 'Terminate security system'."
            ));
        }
        if ["status", "state", "how is"]
            .iter()
            .any(|word| lower.contains(word))
        {
            return InterpretOutcome::reply_only(self.status_reply(user_name));
        }

        InterpretOutcome::reply_only(format!(
            "Sorry {user_name}, I didn't understand that command. Try saying 'Turn on the \
             light' or 'Turn off the AC'."
        ))
    }

    async fn switch_command(
        &self,
        kind: ApplianceKind,
        action: SwitchState,
        user_name: &str,
        user_id: i64,
    ) -> InterpretOutcome {
        match self.apply_switch(kind, action, user_name, Some(user_id)).await {
            Ok(notification) => InterpretOutcome {
                reply: format!("✅ {} turned {}.", kind.display_name(), action.label()),
                notification: Some(notification),
            },
            Err(err) => {
                tracing::warn!(error = %err, device = kind.slug(), "actuation failed");
                InterpretOutcome::reply_only(format!(
                    "⚠️ Error turning {} {}. Please try again.",
                    state_word(action),
                    kind.display_name(),
                ))
            }
        }
    }

    async fn security_command(
        &self,
        lower: &str,
        user_name: &str,
        user_id: i64,
    ) -> InterpretOutcome {
        // Disarm keywords are checked first: "deactivate" contains
        // "activate" and "disarm" contains "arm".
        let disarm = ["terminate", "stop", "deactivate", "disarm"]
            .iter()
            .any(|word| lower.contains(word));
        let arm = ["initialize", "start", "activate", "arm"]
            .iter()
            .any(|word| lower.contains(word));

        if disarm {
            return match self.terminate_security(user_name, Some(user_id)).await {
                Ok(notification) => InterpretOutcome {
                    reply: "✅ Home Security System TERMINATED. All modules deactivated."
                        .to_string(),
                    notification: Some(notification),
                },
                Err(err) => {
                    tracing::warn!(error = %err, "security termination failed");
                    InterpretOutcome::reply_only(
                        "⚠️ Error terminating security system. Please try again.",
                    )
                }
            };
        }
        if arm {
            return match self.initialize_security(user_name, Some(user_id)).await {
                Ok(notification) => InterpretOutcome {
                    reply: "✅ Home Security System INITIALIZED. Laser module activated and \
                            monitoring for intruders."
                        .to_string(),
                    notification: Some(notification),
                },
                Err(err) => {
                    tracing::warn!(error = %err, "security initialization failed");
                    InterpretOutcome::reply_only(
                        "⚠️ Error initializing security system. Please try again.",
                    )
                }
            };
        }

        InterpretOutcome::reply_only(format!(
            "🛡️ Home Security System is currently {}.",
            self.registry.security().status_label(),
        ))
    }

    async fn schedule_command(&self, lower: &str, user_name: &str) -> InterpretOutcome {
        let Some(delay) = parse_schedule_delay(lower) else {
            return InterpretOutcome::reply_only(
                "⚠️ Unsupported schedule format. Try: 'Schedule light on in 30 seconds' or \
                 'Schedule light on in 5 minutes' or 'Schedule ac off in 1 hour'",
            );
        };
        let (Some(kind), Some(action)) = (detect_appliance(lower), detect_schedule_action(lower))
        else {
            return InterpretOutcome::reply_only(
                "⚠️ Could not determine device or action for scheduling.",
            );
        };

        let scheduled_time = time::now() + delay;
        let task = ScheduledTask {
            device: kind,
            action,
            scheduled_time,
            user_name: user_name.to_string(),
        };
        let snapshot = {
            let mut tasks = self.tasks.lock();
            tasks.push(task);
            tasks.clone()
        };
        if let Err(err) = self.store.save_tasks(&snapshot).await {
            tracing::error!(error = %err, "failed to persist scheduled tasks");
        }

        let time_display = format_clock(scheduled_time);
        self.center
            .log_event(
                EventKind::ScheduledTaskCreated,
                format!(
                    "Scheduled {} to turn {} at {time_display}",
                    kind.display_name(),
                    action.label(),
                ),
                Some(user_name),
                None,
            )
            .await;

        InterpretOutcome::reply_only(format!(
            "⏰ Scheduled {} to turn {} at {time_display}.",
            kind.display_name(),
            action.label(),
        ))
    }

    fn status_reply(&self, user_name: &str) -> String {
        let snapshot = self.registry.snapshot();
        let mut reply = format!("🏠 {user_name}, Current Device Status:\n");
        for appliance in snapshot.appliances {
            reply.push_str(&format!(
                "• {}: {}\n",
                appliance.kind.display_name(),
                appliance.state.title(),
            ));
        }
        reply.push_str(&format!(
            "• Home Security System: {}\n",
            snapshot.security.status_label(),
        ));
        reply
    }
}

fn state_word(state: SwitchState) -> &'static str {
    match state {
        SwitchState::On => "on",
        SwitchState::Off => "off",
    }
}

/// Which appliance the text refers to. Washing machine wins over the
/// air-conditioner, whose heuristics would otherwise match "machine".
pub(crate) fn detect_appliance(lower: &str) -> Option<ApplianceKind> {
    if lower.contains("washing machine") {
        Some(ApplianceKind::WashingMachine)
    } else if mentions_ac(lower) {
        Some(ApplianceKind::Ac)
    } else if lower.contains("light") {
        Some(ApplianceKind::Light)
    } else {
        None
    }
}

/// Loose air-conditioner heuristics, preserved as-is: prefix `ac`,
/// substring `"ac "`, substring `" air condition"`, or the exact token
/// `ac` anywhere.
pub(crate) fn mentions_ac(lower: &str) -> bool {
    lower.starts_with("ac")
        || lower.contains("ac ")
        || lower.contains(" air condition")
        || lower.split_whitespace().any(|token| token == "ac")
}

/// `turn on`/`switch on` wins over the off phrases when both appear.
pub(crate) fn detect_action(lower: &str) -> Option<SwitchState> {
    if lower.contains("turn on") || lower.contains("switch on") {
        Some(SwitchState::On)
    } else if lower.contains("turn off") || lower.contains("switch off") {
        Some(SwitchState::Off)
    } else {
        None
    }
}

/// Scheduling phrases usually elide the verb ("schedule light on in 30
/// seconds"), so a bare `on`/`off` token counts as the action there.
pub(crate) fn detect_schedule_action(lower: &str) -> Option<SwitchState> {
    detect_action(lower).or_else(|| {
        lower.split_whitespace().find_map(|token| match token {
            "on" => Some(SwitchState::On),
            "off" => Some(SwitchState::Off),
            _ => None,
        })
    })
}

pub(crate) fn mentions_security(lower: &str) -> bool {
    ["security", "laser", "intruder"]
        .iter()
        .any(|word| lower.contains(word))
}

/// Extract the delay from the phrase `in N <unit>` where the unit starts
/// with `second`, `minute` or `hour`. Trailing punctuation on the unit is
/// ignored.
pub(crate) fn parse_schedule_delay(lower: &str) -> Option<ChronoDuration> {
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    for window in tokens.windows(3) {
        if window[0] != "in" {
            continue;
        }
        let Ok(amount) = window[1].parse::<i64>() else {
            continue;
        };
        let unit = window[2].trim_end_matches(|c: char| !c.is_ascii_alphabetic());
        let delay = if unit.starts_with("second") {
            ChronoDuration::seconds(amount)
        } else if unit.starts_with("minute") {
            ChronoDuration::minutes(amount)
        } else if unit.starts_with("hour") {
            ChronoDuration::hours(amount)
        } else {
            continue;
        };
        return Some(delay);
    }
    None
}
