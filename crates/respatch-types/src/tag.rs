use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Resource type of a node inside a container file.
///
/// Tags are plain identifiers (`"ARC"`, `"MDL0"`, `"TEX0"`, ...) so rule
/// sets can name types that this crate does not know about. The well-known
/// tags are available as associated constants.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    /// Archive container (`.pac` / `.pcs` style ARC file).
    pub const ARCHIVE: Self = Self::from_static("ARC");
    /// Resource pack holding models, textures and animations.
    pub const RESOURCE_PACK: Self = Self::from_static("BRES");
    /// Resource-group folder inside a resource pack ("Textures(NW4R)", ...).
    pub const RESOURCE_GROUP: Self = Self::from_static("BRESGroup");
    /// 3D model.
    pub const MODEL: Self = Self::from_static("MDL0");
    /// Grouping folder inside a model ("Bones", "Definitions", ...).
    pub const MODEL_GROUP: Self = Self::from_static("MDL0Group");
    /// Skeleton bone.
    pub const BONE: Self = Self::from_static("MDL0Bone");
    /// Texture.
    pub const TEXTURE: Self = Self::from_static("TEX0");
    /// Color palette.
    pub const PALETTE: Self = Self::from_static("PLT0");
    /// Bone animation, one entry per animated bone.
    pub const BONE_ANIMATION: Self = Self::from_static("CHR0");
    /// Single bone track of a bone animation.
    pub const BONE_ANIMATION_ENTRY: Self = Self::from_static("CHR0Entry");
    /// Color animation.
    pub const COLOR_ANIMATION: Self = Self::from_static("CLR0");
    /// Texture pattern animation.
    pub const PATTERN_ANIMATION: Self = Self::from_static("PAT0");
    /// Effect resource pack.
    pub const EFFECT_PACK: Self = Self::from_static("REFF");
    /// Effect texture pack.
    pub const EFFECT_TEXTURES: Self = Self::from_static("REFT");
    /// Effect list.
    pub const EFFECT_LIST: Self = Self::from_static("EFLS");
    /// Message/text table.
    pub const MESSAGE_TABLE: Self = Self::from_static("MSBin");
    /// Opaque raw data with no known structure.
    pub const RAW: Self = Self::from_static("Raw");

    const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// Create a tag from an arbitrary identifier.
    ///
    /// Tags must be non-empty and must not contain whitespace or `/`.
    pub fn new(tag: impl Into<String>) -> Result<Self, TypeError> {
        let tag = tag.into();
        if tag.is_empty() || tag.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(TypeError::InvalidTypeTag(tag));
        }
        Ok(Self(Cow::Owned(tag)))
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.0)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TypeTag {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.0.into_owned()
    }
}

impl std::str::FromStr for TypeTag {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
