use crate::core::model::DownloadFailReason;

/// Identifies the user-facing text of a command; rendered by [`crate::i18n`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    DownloadStarted,
    DownloadFinished,
    ConnectionError,
    DownloadManagerDisabled,
    GenericError,
}

/// One outbound instruction for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadCommand {
    ShowDownloadStartedMessage {
        message_id: MessageId,
        show_notification: bool,
        file_name: String,
    },
    ShowDownloadSuccessMessage {
        message_id: MessageId,
        show_notification: bool,
        file_name: String,
        file_path: String,
        mime_type: Option<String>,
    },
    ShowDownloadFailedMessage {
        message_id: MessageId,
        show_notification: bool,
        show_enable_download_manager_action: bool,
    },
}

impl DownloadCommand {
    pub fn message_id(&self) -> MessageId {
        match self {
            DownloadCommand::ShowDownloadStartedMessage { message_id, .. }
            | DownloadCommand::ShowDownloadSuccessMessage { message_id, .. }
            | DownloadCommand::ShowDownloadFailedMessage { message_id, .. } => *message_id,
        }
    }

    pub fn show_notification(&self) -> bool {
        match self {
            DownloadCommand::ShowDownloadStartedMessage { show_notification, .. }
            | DownloadCommand::ShowDownloadSuccessMessage { show_notification, .. }
            | DownloadCommand::ShowDownloadFailedMessage { show_notification, .. } => *show_notification,
        }
    }

    pub(crate) fn failed(reason: DownloadFailReason, show_notification: bool) -> Self {
        DownloadCommand::ShowDownloadFailedMessage {
            message_id: message_for(reason),
            show_notification,
            show_enable_download_manager_action: reason == DownloadFailReason::DownloadManagerDisabled,
        }
    }
}

/// Total mapping from failure cause to message. Keep this match free of a wildcard arm.
pub fn message_for(reason: DownloadFailReason) -> MessageId {
    match reason {
        DownloadFailReason::ConnectionRefused => MessageId::ConnectionError,
        DownloadFailReason::DownloadManagerDisabled => MessageId::DownloadManagerDisabled,
        DownloadFailReason::Other
        | DownloadFailReason::UnsupportedUrlType
        | DownloadFailReason::DataUriParseException => MessageId::GenericError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DownloadFailReason::ConnectionRefused, MessageId::ConnectionError, false)]
    #[case(DownloadFailReason::DownloadManagerDisabled, MessageId::DownloadManagerDisabled, true)]
    #[case(DownloadFailReason::UnsupportedUrlType, MessageId::GenericError, false)]
    #[case(DownloadFailReason::DataUriParseException, MessageId::GenericError, false)]
    #[case(DownloadFailReason::Other, MessageId::GenericError, false)]
    fn failed_command_maps_reason(
        #[case] reason: DownloadFailReason,
        #[case] expected: MessageId,
        #[case] offers_enable: bool,
    ) {
        let cmd = DownloadCommand::failed(reason, true);
        assert_eq!(cmd.message_id(), expected);
        assert!(cmd.show_notification());
        match cmd {
            DownloadCommand::ShowDownloadFailedMessage { show_enable_download_manager_action, .. } => {
                assert_eq!(show_enable_download_manager_action, offers_enable)
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn only_download_manager_disabled_offers_enable_action() {
        let offering: Vec<_> = DownloadFailReason::ALL
            .into_iter()
            .filter(|r| {
                matches!(
                    DownloadCommand::failed(*r, false),
                    DownloadCommand::ShowDownloadFailedMessage { show_enable_download_manager_action: true, .. }
                )
            })
            .collect();
        assert_eq!(offering, vec![DownloadFailReason::DownloadManagerDisabled]);
    }
}
