/// What the frame loop does after `get_current_texture` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface, configured again; draw on the next frame.
    Reconfigured,
    /// Timeout or transient failure; drop this frame.
    SkipFrame,
    /// Out of memory; stop rendering and exit.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        matches!(self, SurfaceErrorAction::Fatal)
    }
}
