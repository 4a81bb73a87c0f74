#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Image(image::ImageError),
    TomlDeserialize(toml::de::Error),
    MissingResource(String),
    InvalidConfiguration(String),
    SpriteSheetTooSmall {
        sheet: &'static str,
        width: u32,
        height: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IO(value)
    }
}

impl From<image::ImageError> for Error {
    fn from(value: image::ImageError) -> Self {
        Error::Image(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::TomlDeserialize(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(e) => write!(f, "IO error: {e}"),
            Self::Image(e) => write!(f, "image error: {e}"),
            Self::TomlDeserialize(e) => write!(f, "TOML deserialization error: {e}"),
            Self::MissingResource(resource) => write!(f, "missing resource: {resource}"),
            Self::InvalidConfiguration(reason) => write!(f, "invalid configuration: {reason}"),
            Self::SpriteSheetTooSmall { sheet, width, height } => {
                write!(f, "sprite sheet {sheet} too small: {width}x{height}")
            },
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(e) => e.source(),
            Self::Image(e) => e.source(),
            Self::TomlDeserialize(e) => e.source(),
            Self::MissingResource(_) => None,
            Self::InvalidConfiguration(_) => None,
            Self::SpriteSheetTooSmall { .. } => None,
        }
    }
}
