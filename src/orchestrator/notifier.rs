//! Desktop notifications through the external notifier binary

use super::process_runner::ProcessRunner;
use crate::models::{NotificationAction, NotificationKind, NotifierConfig};
use anyhow::Result;

/// A fully rendered notification, ready to hand to the notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub title: String,
    pub sender_id: String,
    /// Replace any earlier notification of the same kind
    pub clear_prior: bool,
    pub button: Option<String>,
}

impl Notification {
    /// Render `action`. `count` fills the `{count}` placeholder of pending messages.
    ///
    /// Returns `None` for [`NotificationAction::None`].
    pub fn render(action: &NotificationAction, count: u32, config: &NotifierConfig) -> Option<Self> {
        let templates = &config.messages;
        let count = count.to_string();
        let button = config.button_label.clone().filter(|label| !label.is_empty());

        let (kind, message, clear_prior, button) = match action {
            NotificationAction::None => return None,
            NotificationAction::NotifyPending { clear_prior: true } => (
                NotificationKind::Pending,
                templates.pending_resolved.replace("{count}", &count),
                true,
                None,
            ),
            NotificationAction::NotifyPending { clear_prior: false } => (
                NotificationKind::Pending,
                templates.pending.replace("{count}", &count),
                false,
                button,
            ),
            NotificationAction::NotifyOsUpdatesPending { clear_prior: true } => (
                NotificationKind::OsUpdates,
                templates.os_updates_resolved.replace("{count}", &count),
                true,
                None,
            ),
            NotificationAction::NotifyOsUpdatesPending { clear_prior: false } => (
                NotificationKind::OsUpdates,
                templates.os_updates.replace("{count}", &count),
                false,
                button,
            ),
            NotificationAction::NotifyInstalled {
                display_name,
                version,
            } => (
                NotificationKind::Installed,
                render_installed(&templates.installed, display_name, version),
                false,
                None,
            ),
        };

        Some(Self {
            kind,
            message,
            title: config.title.clone(),
            sender_id: config.sender_id.clone(),
            clear_prior,
            button,
        })
    }

    /// Argument list for the notifier binary
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--message".to_string(),
            self.message.clone(),
            "--title".to_string(),
            self.title.clone(),
            "--sender".to_string(),
            self.sender_id.clone(),
            "--type".to_string(),
            self.kind.as_arg().to_string(),
        ];

        if self.clear_prior {
            args.push("--remove-prior".to_string());
        }

        if let Some(label) = &self.button {
            args.push("--button".to_string());
            args.push(label.clone());
        }

        args
    }
}

/// Fill the installed template. An empty version takes its leading space with it.
fn render_installed(template: &str, display_name: &str, version: &str) -> String {
    let template = if version.trim().is_empty() {
        template.replace(" {version}", "").replace("{version}", "")
    } else {
        template.replace("{version}", version)
    };
    template.replace("{name}", display_name)
}

/// Sends notifications through a [`ProcessRunner`]
pub struct Notifier<'a> {
    config: &'a NotifierConfig,
    runner: &'a dyn ProcessRunner,
}

impl<'a> Notifier<'a> {
    pub fn new(config: &'a NotifierConfig, runner: &'a dyn ProcessRunner) -> Self {
        Self { config, runner }
    }

    /// Render and send `action`. `Ok(false)` when there was nothing to send.
    pub async fn send(&self, action: &NotificationAction, count: u32) -> Result<bool> {
        let Some(notification) = Notification::render(action, count, self.config) else {
            return Ok(false);
        };

        tracing::info!(
            kind = notification.kind.as_arg(),
            clear_prior = notification.clear_prior,
            message = %notification.message,
            "Sending notification"
        );

        self.runner
            .run(&self.config.path, &notification.to_args())
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_none_is_nothing() {
        let config = NotifierConfig::default();
        assert!(Notification::render(&NotificationAction::None, 3, &config).is_none());
    }

    #[test]
    fn test_pending_args() {
        let mut config = NotifierConfig::default();
        config.title = "IT".to_string();
        config.sender_id = "com.example.msc".to_string();
        config.button_label = Some("Open".to_string());
        config.messages.pending = "{count} pending".to_string();

        let notification = Notification::render(
            &NotificationAction::NotifyPending { clear_prior: false },
            3,
            &config,
        )
        .unwrap();

        assert_eq!(
            notification.to_args(),
            vec![
                "--message",
                "3 pending",
                "--title",
                "IT",
                "--sender",
                "com.example.msc",
                "--type",
                "pending",
                "--button",
                "Open",
            ]
        );
    }

    #[test]
    fn test_resolved_clears_prior_without_button() {
        let config = NotifierConfig::default();
        let notification = Notification::render(
            &NotificationAction::NotifyPending { clear_prior: true },
            0,
            &config,
        )
        .unwrap();

        let args = notification.to_args();
        assert!(args.contains(&"--remove-prior".to_string()));
        assert!(!args.contains(&"--button".to_string()));
        assert_eq!(notification.message, config.messages.pending_resolved);
    }

    #[test]
    fn test_installed_message_keeps_untrusted_text_in_one_argument() {
        let config = NotifierConfig::default();
        let notification = Notification::render(
            &NotificationAction::NotifyInstalled {
                display_name: "Evil \"App\"; rm -rf /".to_string(),
                version: "1.0 $(id)".to_string(),
            },
            0,
            &config,
        )
        .unwrap();

        let args = notification.to_args();
        assert_eq!(args[0], "--message");
        assert_eq!(args[1], "Evil \"App\"; rm -rf / 1.0 $(id) has been installed.");
        assert_eq!(args[7], "installed");
    }

    #[test]
    fn test_installed_without_version_keeps_name_spacing() {
        let config = NotifierConfig::default();
        let render = |name: &str, version: &str| {
            Notification::render(
                &NotificationAction::NotifyInstalled {
                    display_name: name.to_string(),
                    version: version.to_string(),
                },
                0,
                &config,
            )
            .unwrap()
            .message
        };

        assert_eq!(render("Office  365", ""), "Office  365 has been installed.");
        assert_eq!(render("Office  365", "16.0"), "Office  365 16.0 has been installed.");
    }

    #[test]
    fn test_os_update_type() {
        let config = NotifierConfig::default();
        let notification = Notification::render(
            &NotificationAction::NotifyOsUpdatesPending { clear_prior: false },
            2,
            &config,
        )
        .unwrap();
        assert_eq!(notification.kind, NotificationKind::OsUpdates);
        assert!(notification.message.starts_with("2 macOS update(s)"));
    }
}
