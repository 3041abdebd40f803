//! Inbound commands to the door service.
//!
//! These represent actions requested by the outside world (the message
//! link, a future scheduler) that the
//! [`DoorService`](super::service::DoorService) interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCommand {
    /// Drive the door toward fully open.
    Open,
    /// Drive the door toward fully closed.
    Close,
    /// Halt any in-progress travel.
    Stop,
    /// Report the continuous position to the requesting peer.
    GetPosition,
    /// Report the remembered travel direction to the requesting peer.
    GetDirection,
    /// Report the discrete state to the requesting peer.
    GetState,
}

impl DoorCommand {
    /// Decode a command line from the link.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace;
    /// anything unrecognized yields `None` (the dispatcher logs it and
    /// sends no reply).
    pub fn parse(line: &str) -> Option<Self> {
        let mut upper = heapless::String::<32>::new();
        for ch in line.trim().chars() {
            upper.push(ch.to_ascii_uppercase()).ok()?;
        }
        match upper.as_str() {
            "OPEN" => Some(Self::Open),
            "CLOSE" => Some(Self::Close),
            "STOP" => Some(Self::Stop),
            "GETPOSITION" => Some(Self::GetPosition),
            "GETDIRECTION" => Some(Self::GetDirection),
            "GETSTATE" => Some(Self::GetState),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_uppercase() {
        assert_eq!(DoorCommand::parse("OPEN"), Some(DoorCommand::Open));
        assert_eq!(DoorCommand::parse("CLOSE"), Some(DoorCommand::Close));
        assert_eq!(DoorCommand::parse("STOP"), Some(DoorCommand::Stop));
        assert_eq!(
            DoorCommand::parse("GETPOSITION"),
            Some(DoorCommand::GetPosition)
        );
        assert_eq!(
            DoorCommand::parse("GETDIRECTION"),
            Some(DoorCommand::GetDirection)
        );
        assert_eq!(DoorCommand::parse("GETSTATE"), Some(DoorCommand::GetState));
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(DoorCommand::parse("open"), Some(DoorCommand::Open));
        assert_eq!(DoorCommand::parse("Stop"), Some(DoorCommand::Stop));
        assert_eq!(
            DoorCommand::parse("getPosition"),
            Some(DoorCommand::GetPosition)
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(DoorCommand::parse("  close \r"), Some(DoorCommand::Close));
    }

    #[test]
    fn unknown_commands_yield_none() {
        assert_eq!(DoorCommand::parse(""), None);
        assert_eq!(DoorCommand::parse("TOGGLE"), None);
        assert_eq!(DoorCommand::parse("OPEN SESAME"), None);
    }

    #[test]
    fn absurdly_long_input_yields_none() {
        let long = "X".repeat(512);
        assert_eq!(DoorCommand::parse(&long), None);
    }
}
