/// App-specific icons embedded from resources/icons/
///
/// Icons are loaded through GPUI's `AssetSource` via the `path()` method:
///
/// ```rust,ignore
/// svg().path(AppIcon::Trash2.path()).size_4().text_color(theme.foreground)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppIcon {
    Check,
    Minus,
    X,
    Trash2,
    GitCompare,
    Download,
    Eye,
    Loader,
    RefreshCcw,
    TriangleAlert,
    FlaskConical,
}

pub const ALL_ICONS: &[AppIcon] = &[
    AppIcon::Check,
    AppIcon::Minus,
    AppIcon::X,
    AppIcon::Trash2,
    AppIcon::GitCompare,
    AppIcon::Download,
    AppIcon::Eye,
    AppIcon::Loader,
    AppIcon::RefreshCcw,
    AppIcon::TriangleAlert,
    AppIcon::FlaskConical,
];

impl AppIcon {
    /// Asset path for this icon.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Check => "icons/ui/check.svg",
            Self::Minus => "icons/ui/minus.svg",
            Self::X => "icons/ui/x.svg",
            Self::Trash2 => "icons/ui/trash-2.svg",
            Self::GitCompare => "icons/ui/git-compare.svg",
            Self::Download => "icons/ui/download.svg",
            Self::Eye => "icons/ui/eye.svg",
            Self::Loader => "icons/ui/loader.svg",
            Self::RefreshCcw => "icons/ui/refresh-ccw.svg",
            Self::TriangleAlert => "icons/ui/triangle-alert.svg",
            Self::FlaskConical => "icons/ui/flask-conical.svg",
        }
    }

    pub fn embedded_bytes(self) -> &'static [u8] {
        match self {
            Self::Check => include_bytes!("../../../resources/icons/ui/check.svg"),
            Self::Minus => include_bytes!("../../../resources/icons/ui/minus.svg"),
            Self::X => include_bytes!("../../../resources/icons/ui/x.svg"),
            Self::Trash2 => include_bytes!("../../../resources/icons/ui/trash-2.svg"),
            Self::GitCompare => include_bytes!("../../../resources/icons/ui/git-compare.svg"),
            Self::Download => include_bytes!("../../../resources/icons/ui/download.svg"),
            Self::Eye => include_bytes!("../../../resources/icons/ui/eye.svg"),
            Self::Loader => include_bytes!("../../../resources/icons/ui/loader.svg"),
            Self::RefreshCcw => include_bytes!("../../../resources/icons/ui/refresh-ccw.svg"),
            Self::TriangleAlert => {
                include_bytes!("../../../resources/icons/ui/triangle-alert.svg")
            }
            Self::FlaskConical => include_bytes!("../../../resources/icons/ui/flask-conical.svg"),
        }
    }
}
