use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::consts::LVDATA_NAMESPACE;
use crate::error::{Result, TdviewError};

pub const EXPERIMENT_NAME_FIELD: &str = "Experiment Name";
pub const PIXEL_COUNT_CLUSTER: &str = "Pixel Count";
pub const PIXELS_X_FIELD: &str = "Pixels in X";
pub const PIXELS_Y_FIELD: &str = "Pixels in Y";

/// Acquisition parameters stored in the LabVIEW XML next to each recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExperimentParams {
    pub name: String,
    pub pixels_x: usize,
    pub pixels_y: usize,
}

impl ExperimentParams {
    /// Measurement container path: `<xml dir>/<experiment name>.<extension>`.
    pub fn tdms_path(&self, xml_path: &Path, extension: &str) -> PathBuf {
        let file_name = format!("{}.{}", self.name, extension);
        match xml_path.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Render the parameters as a minimal LVData document.
    pub fn to_lvdata_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<LVData xmlns="{ns}">
<Version>21.0</Version>
<Cluster>
<Name>Settings</Name>
<NumElts>2</NumElts>
<Cluster>
<Name>Experiment</Name>
<NumElts>1</NumElts>
<String>
<Name>{name_field}</Name>
<Val>{name}</Val>
</String>
</Cluster>
<Cluster>
<Name>{pixel_cluster}</Name>
<NumElts>2</NumElts>
<U32>
<Name>{x_field}</Name>
<Val>{x}</Val>
</U32>
<U32>
<Name>{y_field}</Name>
<Val>{y}</Val>
</U32>
</Cluster>
</Cluster>
</LVData>
"#,
            ns = LVDATA_NAMESPACE,
            name_field = EXPERIMENT_NAME_FIELD,
            name = escape_xml(&self.name),
            pixel_cluster = PIXEL_COUNT_CLUSTER,
            x_field = PIXELS_X_FIELD,
            x = self.pixels_x,
            y_field = PIXELS_Y_FIELD,
            y = self.pixels_y,
        )
    }
}

/// Read experiment parameters from an XML file.
pub fn read_experiment(path: &Path) -> Result<ExperimentParams> {
    let text = std::fs::read_to_string(path)?;
    parse_experiment(&text)
}

/// Parse experiment parameters from LVData XML text.
pub fn parse_experiment(text: &str) -> Result<ExperimentParams> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();

    let name = root
        .descendants()
        .filter(|n| is_lv(n, "String") && field_name(n) == Some(EXPERIMENT_NAME_FIELD))
        .find(|n| nested_in_clusters(n))
        .ok_or_else(|| missing(EXPERIMENT_NAME_FIELD))
        .and_then(|n| value_text(&n, EXPERIMENT_NAME_FIELD))?
        .to_string();

    let pixels_x = pixel_count(root, PIXELS_X_FIELD)?;
    let pixels_y = pixel_count(root, PIXELS_Y_FIELD)?;

    tracing::debug!(%name, pixels_x, pixels_y, "Parsed experiment metadata");
    Ok(ExperimentParams { name, pixels_x, pixels_y })
}

fn pixel_count(root: Node<'_, '_>, field: &str) -> Result<usize> {
    let node = root
        .descendants()
        .filter(|n| is_lv(n, "U32") && field_name(n) == Some(field))
        .find(|n| {
            n.parent_element().is_some_and(|cluster| {
                field_name(&cluster) == Some(PIXEL_COUNT_CLUSTER) && nested_in_clusters(n)
            })
        })
        .ok_or_else(|| missing(field))?;

    let text = value_text(&node, field)?;
    text.trim().parse::<usize>().map_err(|e| TdviewError::MetadataParse {
        field: field.to_string(),
        reason: format!("'{text}' is not an unsigned integer: {e}"),
    })
}

fn is_lv(node: &Node<'_, '_>, tag: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == tag
        && node.tag_name().namespace() == Some(LVDATA_NAMESPACE)
}

/// Node sits directly inside a `Cluster` that is itself inside a `Cluster`.
fn nested_in_clusters(node: &Node<'_, '_>) -> bool {
    node.parent_element()
        .filter(|p| is_lv(p, "Cluster"))
        .and_then(|p| p.parent_element())
        .is_some_and(|gp| is_lv(&gp, "Cluster"))
}

fn child_text<'a>(node: &Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children().find(|c| is_lv(c, tag)).and_then(|c| c.text())
}

fn field_name<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    child_text(node, "Name").map(str::trim)
}

fn value_text<'a>(node: &Node<'a, '_>, field: &str) -> Result<&'a str> {
    child_text(node, "Val").ok_or_else(|| TdviewError::MetadataParse {
        field: field.to_string(),
        reason: "element has no Val".into(),
    })
}

fn missing(field: &str) -> TdviewError {
    TdviewError::MetadataParse {
        field: field.to_string(),
        reason: "element not found".into(),
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
