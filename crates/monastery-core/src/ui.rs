//! UI entry points, independent of where the events come from

use tracing::warn;

use crate::error::ViewerError;
use crate::view::ViewName;

/// Everything the page controls can ask of the viewer
pub trait ViewerEvents {
    fn on_toggle(&mut self, auto_rotate: bool);
    fn on_slider_change(&mut self, speed: f32);
    fn on_view_select(&mut self, view: ViewName) -> ViewName;
    fn on_next(&mut self) -> ViewName;
    fn on_previous(&mut self) -> ViewName;
    fn on_reset(&mut self) -> ViewName;
    fn on_resize(&mut self, width: u32, height: u32);
}

/// A queued UI event.
///
/// DOM callbacks parse raw control values into commands; a per-frame system
/// applies them in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiCommand {
    SetAutoRotate(bool),
    SetRotationSpeed(f32),
    SelectView(ViewName),
    NextView,
    PreviousView,
    ResetView,
    Resize { width: u32, height: u32 },
}

impl UiCommand {
    /// Parse a rotation speed slider value
    pub fn from_slider(value: &str) -> Result<Self, ViewerError> {
        match value.trim().parse::<f32>() {
            Ok(speed) if speed.is_finite() => Ok(UiCommand::SetRotationSpeed(speed)),
            _ => Err(ViewerError::InvalidRotationSpeed(value.to_string())),
        }
    }

    /// Parse a view selector value
    pub fn from_view(value: &str) -> Result<Self, ViewerError> {
        value.parse().map(UiCommand::SelectView)
    }

    /// Parse a raw control value, logging and dropping it when invalid
    pub fn parse_or_warn(
        parse: fn(&str) -> Result<Self, ViewerError>,
        value: &str,
    ) -> Option<Self> {
        match parse(value) {
            Ok(command) => Some(command),
            Err(e) => {
                warn!(error = %e, "Ignoring UI input");
                None
            }
        }
    }

    /// Deliver to `target`. Returns the new view when the command changed it,
    /// so the view selector can be kept in sync.
    pub fn apply<T: ViewerEvents + ?Sized>(self, target: &mut T) -> Option<ViewName> {
        match self {
            UiCommand::SetAutoRotate(on) => {
                target.on_toggle(on);
                None
            }
            UiCommand::SetRotationSpeed(speed) => {
                target.on_slider_change(speed);
                None
            }
            UiCommand::SelectView(view) => Some(target.on_view_select(view)),
            UiCommand::NextView => Some(target.on_next()),
            UiCommand::PreviousView => Some(target.on_previous()),
            UiCommand::ResetView => Some(target.on_reset()),
            UiCommand::Resize { width, height } => {
                target.on_resize(width, height);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl ViewerEvents for Log {
        fn on_toggle(&mut self, auto_rotate: bool) {
            self.0.push(format!("toggle {auto_rotate}"));
        }
        fn on_slider_change(&mut self, speed: f32) {
            self.0.push(format!("speed {speed}"));
        }
        fn on_view_select(&mut self, view: ViewName) -> ViewName {
            self.0.push(format!("select {view}"));
            view
        }
        fn on_next(&mut self) -> ViewName {
            self.0.push("next".into());
            ViewName::Interior
        }
        fn on_previous(&mut self) -> ViewName {
            self.0.push("previous".into());
            ViewName::Courtyard
        }
        fn on_reset(&mut self) -> ViewName {
            self.0.push("reset".into());
            ViewName::Exterior
        }
        fn on_resize(&mut self, width: u32, height: u32) {
            self.0.push(format!("resize {width}x{height}"));
        }
    }

    #[test]
    fn test_slider_parsing() {
        assert_eq!(UiCommand::from_slider(" 1.5 ").unwrap(), UiCommand::SetRotationSpeed(1.5));
        assert_eq!(UiCommand::from_slider("-2").unwrap(), UiCommand::SetRotationSpeed(-2.0));
        for bad in ["", "fast", "NaN", "inf"] {
            assert!(matches!(
                UiCommand::from_slider(bad),
                Err(ViewerError::InvalidRotationSpeed(_))
            ));
        }
    }

    #[test]
    fn test_unknown_view_is_dropped() {
        assert_eq!(
            UiCommand::parse_or_warn(UiCommand::from_view, "courtyard"),
            Some(UiCommand::SelectView(ViewName::Courtyard))
        );
        assert_eq!(UiCommand::parse_or_warn(UiCommand::from_view, "crypt"), None);
    }

    #[test]
    fn test_apply_dispatches_and_reports_view_changes() {
        let mut log = Log::default();
        let changes: Vec<_> = [
            UiCommand::SetAutoRotate(false),
            UiCommand::SetRotationSpeed(0.25),
            UiCommand::SelectView(ViewName::Courtyard),
            UiCommand::NextView,
            UiCommand::PreviousView,
            UiCommand::ResetView,
            UiCommand::Resize { width: 640, height: 480 },
        ]
        .into_iter()
        .map(|command| command.apply(&mut log))
        .collect();

        assert_eq!(
            changes,
            vec![
                None,
                None,
                Some(ViewName::Courtyard),
                Some(ViewName::Interior),
                Some(ViewName::Courtyard),
                Some(ViewName::Exterior),
                None,
            ]
        );
        assert_eq!(log.0[0], "toggle false");
        assert_eq!(log.0[6], "resize 640x480");
    }
}
