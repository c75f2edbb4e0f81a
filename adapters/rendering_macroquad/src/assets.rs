use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use box_siege_rendering::Scene;
use macroquad::texture::Texture2D;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const ALL_ASSET_KEYS: [AssetKey; 3] = [AssetKey::TerminalBox, AssetKey::HitClip, AssetKey::DeathClip];

/// Assets the adapter resolves through the manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum AssetKey {
    /// Artwork drawn in place of the box at the terminal stage.
    TerminalBox,
    /// Clip played when a unit strikes the box.
    HitClip,
    /// Clip played when the box's health is depleted.
    DeathClip,
}

/// Paths resolved from the asset manifest.
#[derive(Debug)]
pub(crate) struct AssetCatalog {
    paths: HashMap<AssetKey, PathBuf>,
}

impl AssetCatalog {
    /// Loads the default asset manifest from disk.
    pub(crate) fn from_default_manifest() -> Result<Self> {
        Self::from_manifest_path(Self::default_manifest_path())
    }

    /// Loads asset paths from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read asset manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Ok(Self {
            paths: entries.into_iter().collect(),
        })
    }

    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Retrieves the path registered for the provided key.
    pub(crate) fn path(&self, key: AssetKey) -> Result<&Path> {
        self.paths
            .get(&key)
            .map(PathBuf::as_path)
            .with_context(|| format!("asset {key:?} missing from catalog"))
    }
}

/// Reads an image asset from disk into a GPU texture.
pub(crate) fn load_texture(path: &Path) -> Result<Texture2D> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

/// Lazily resolved terminal-stage artwork.
///
/// The texture is requested from the catalog exactly once, on the first frame
/// whose scene reports the terminal stage.
#[derive(Debug)]
pub(crate) struct TerminalArt {
    catalog: AssetCatalog,
    texture: Option<Texture2D>,
    attempted: bool,
}

impl TerminalArt {
    pub(crate) fn new(catalog: AssetCatalog) -> Self {
        Self {
            catalog,
            texture: None,
            attempted: false,
        }
    }

    pub(crate) fn ensure_loaded(&mut self, scene: &Scene) {
        if !scene.target_box.terminal || self.attempted {
            return;
        }
        self.attempted = true;

        let loaded = self
            .catalog
            .path(AssetKey::TerminalBox)
            .and_then(load_texture);
        match loaded {
            Ok(texture) => self.texture = Some(texture),
            Err(error) => eprintln!("failed to load terminal artwork: {error:#}"),
        }
    }

    pub(crate) fn texture(&self) -> Option<Texture2D> {
        self.texture
    }
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    assets: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(AssetKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.assets {
        let key = parse_asset_key(&name)
            .with_context(|| format!("unknown asset key `{name}` in manifest"))?;
        let path = base_path.join(relative_path);
        if resolved.insert(key, path).is_some() {
            bail!("asset manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(ALL_ASSET_KEYS.len());
    for key in ALL_ASSET_KEYS {
        let Some(path) = resolved.remove(&key) else {
            bail!("asset manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    if !resolved.is_empty() {
        let unexpected = resolved
            .into_keys()
            .map(|key| format!("{key:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        bail!("asset manifest contains unexpected keys: {unexpected}");
    }

    Ok(ordered)
}

fn parse_asset_key(name: &str) -> Result<AssetKey> {
    match name {
        "TerminalBox" => Ok(AssetKey::TerminalBox),
        "HitClip" => Ok(AssetKey::HitClip),
        "DeathClip" => Ok(AssetKey::DeathClip),
        _ => bail!("unknown asset key `{name}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_requires_all_known_keys() {
        let manifest = r#"
            version = 1

            [assets]
            TerminalBox = "box_terminal.png"
            HitClip = "hit.wav"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "manifest missing DeathClip should fail");
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = r#"
            version = 1

            [assets]
            TerminalBox = "box_terminal.png"
            HitClip = "hit.wav"
            DeathClip = "death.wav"
            Extra = "extra.png"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_unsupported_versions() {
        let manifest = r#"
            version = 2

            [assets]
            TerminalBox = "box_terminal.png"
            HitClip = "hit.wav"
            DeathClip = "death.wav"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "future versions must be rejected");
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let manifest = r#"
            version = 1

            [assets]
            HitClip = "sounds/hit.wav"
            DeathClip = "sounds/death.wav"
            TerminalBox = "art/box_terminal.png"
        "#;

        let parsed = parse_manifest(manifest, Path::new("root")).expect("manifest should parse");
        let expected = vec![
            (
                AssetKey::TerminalBox,
                PathBuf::from("root/art/box_terminal.png"),
            ),
            (AssetKey::HitClip, PathBuf::from("root/sounds/hit.wav")),
            (AssetKey::DeathClip, PathBuf::from("root/sounds/death.wav")),
        ];
        assert_eq!(parsed, expected);
    }
}
