//! User-facing texts for download messages.
//! Locale can be selected via the `--locale` CLI flag (e.g. `--locale zh`).

use crate::core::events::{DownloadCommand, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" | "zh-hans" | "zh-tw" | "zh_tw" => Self::Zh,
            _ => Self::En,
        }
    }
}

pub struct Messages {
    pub download_started: &'static str,
    pub download_finished: &'static str,
    pub connection_error: &'static str,
    pub download_manager_disabled: &'static str,
    pub generic_error: &'static str,
    pub enable_download_manager_action: &'static str,
    pub notification_prefix: &'static str,
}

pub static EN: Messages = Messages {
    download_started: "Downloading",
    download_finished: "Download complete",
    connection_error: "Couldn't download. Check your internet connection.",
    download_manager_disabled: "Download failed. The system download manager is disabled.",
    generic_error: "Couldn't download the file.",
    enable_download_manager_action: "Enable",
    notification_prefix: "NOTIFY",
};

pub static ZH: Messages = Messages {
    download_started: "正在下载",
    download_finished: "下载完成",
    connection_error: "无法下载，请检查网络连接。",
    download_manager_disabled: "下载失败，系统下载管理器已停用。",
    generic_error: "无法下载该文件。",
    enable_download_manager_action: "启用",
    notification_prefix: "通知",
};

pub fn get_messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::En => &EN,
        Locale::Zh => &ZH,
    }
}

impl Messages {
    pub fn text(&self, id: MessageId) -> &'static str {
        match id {
            MessageId::DownloadStarted => self.download_started,
            MessageId::DownloadFinished => self.download_finished,
            MessageId::ConnectionError => self.connection_error,
            MessageId::DownloadManagerDisabled => self.download_manager_disabled,
            MessageId::GenericError => self.generic_error,
        }
    }

    /// One-line rendering of a command, the way a transient in-app message shows it.
    pub fn render(&self, cmd: &DownloadCommand) -> String {
        let base = match cmd {
            DownloadCommand::ShowDownloadStartedMessage { message_id, file_name, .. } => {
                format!("{} {}", self.text(*message_id), file_name)
            }
            DownloadCommand::ShowDownloadSuccessMessage { message_id, file_name, file_path, .. } => {
                format!("{}: {} ({})", self.text(*message_id), file_name, file_path)
            }
            DownloadCommand::ShowDownloadFailedMessage {
                message_id,
                show_enable_download_manager_action,
                ..
            } => {
                if *show_enable_download_manager_action {
                    format!("{} [{}]", self.text(*message_id), self.enable_download_manager_action)
                } else {
                    self.text(*message_id).to_string()
                }
            }
        };
        if cmd.show_notification() {
            format!("[{}] {}", self.notification_prefix, base)
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parse_falls_back_to_english() {
        assert_eq!(Locale::parse("zh-CN"), Locale::Zh);
        assert_eq!(Locale::parse("fr"), Locale::En);
    }

    #[test]
    fn render_failed_with_enable_action() {
        let cmd = DownloadCommand::ShowDownloadFailedMessage {
            message_id: MessageId::DownloadManagerDisabled,
            show_notification: true,
            show_enable_download_manager_action: true,
        };
        assert_eq!(
            get_messages(Locale::En).render(&cmd),
            "[NOTIFY] Download failed. The system download manager is disabled. [Enable]"
        );
    }

    #[test]
    fn render_success_without_notification() {
        let cmd = DownloadCommand::ShowDownloadSuccessMessage {
            message_id: MessageId::DownloadFinished,
            show_notification: false,
            file_name: "a.pdf".into(),
            file_path: "/d/a.pdf".into(),
            mime_type: None,
        };
        assert_eq!(get_messages(Locale::En).render(&cmd), "Download complete: a.pdf (/d/a.pdf)");
    }
}
