use wasm_bindgen::JsValue;

/// Failure while reading a GPX document for its track points.
#[derive(Debug)]
pub enum TrackError {
    XmlParse(quick_xml::Error),
    UnclosedElement(String),
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XmlParse(e) => write!(f, "XML parse error: {e}"),
            Self::UnclosedElement(name) => {
                write!(f, "Document ended before <{name}> was closed")
            }
        }
    }
}

impl std::error::Error for TrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::XmlParse(e) => Some(e),
            Self::UnclosedElement(_) => None,
        }
    }
}

impl From<quick_xml::Error> for TrackError {
    fn from(e: quick_xml::Error) -> Self {
        Self::XmlParse(e)
    }
}

impl From<quick_xml::events::attributes::AttrError> for TrackError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::XmlParse(e.into())
    }
}

/// Failure while turning settings and block options into a usable map.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingApiKey,
    InvalidSettings(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(
                f,
                "No OS Maps API key configured: set one in the plugin settings or with `apiKey:`"
            ),
            Self::InvalidSettings(msg) => write!(f, "Invalid plugin settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<TrackError> for JsValue {
    fn from(e: TrackError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

impl From<ConfigError> for JsValue {
    fn from(e: ConfigError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
