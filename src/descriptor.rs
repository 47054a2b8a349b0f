//! Typed view over the object graph of a `project.pbxproj`.
//!
//! Only the records the navigator needs are modelled: groups, file
//! references and targets. Every other object kind is kept as
//! [`ObjectRecord::Other`] so lookups can still tell "unknown kind" apart
//! from "missing identifier".

use crate::error::XcnavError;
use indexmap::IndexMap;
use plist::{Dictionary, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub type ObjectId = String;

/// How a record's `path` is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceTree {
    /// `<group>`: relative to the enclosing group.
    Group,
    /// `SOURCE_ROOT`: relative to the directory holding the `.xcodeproj`.
    SourceRoot,
    /// `<absolute>`
    Absolute,
    /// Missing, or a build-setting anchor the navigator cannot resolve.
    None,
}

impl SourceTree {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("<group>") => SourceTree::Group,
            Some("SOURCE_ROOT") => SourceTree::SourceRoot,
            Some("<absolute>") => SourceTree::Absolute,
            _ => SourceTree::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    /// `PBXGroup`
    Virtual,
    /// `PBXVariantGroup`, the per-language variants of a localized file.
    Variant,
    /// `PBXFileSystemSynchronizedRootGroup`
    Synchronized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: SourceTree,
    pub children: Vec<ObjectId>,
    pub kind: GroupKind,
}

impl GroupRecord {
    pub fn new(kind: GroupKind) -> Self {
        Self {
            name: None,
            path: None,
            source_tree: SourceTree::Group,
            children: Vec::new(),
            kind,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn source_tree(mut self, source_tree: SourceTree) -> Self {
        self.source_tree = source_tree;
        self
    }

    pub fn children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ObjectId>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: SourceTree,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, source_tree: SourceTree) -> Self {
        Self {
            name: None,
            path: Some(path.into()),
            source_tree,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetRecord {
    pub name: String,
    pub product_reference: Option<ObjectId>,
    /// File references compiled by the target's sources build phase.
    pub source_files: Vec<ObjectId>,
    /// Synchronized root groups the target owns.
    pub synchronized_groups: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectRecord {
    Group(GroupRecord),
    File(FileRecord),
    Target(TargetRecord),
    Other { isa: String },
}

impl ObjectRecord {
    pub fn isa(&self) -> &str {
        match self {
            ObjectRecord::Group(group) => match group.kind {
                GroupKind::Virtual => "PBXGroup",
                GroupKind::Variant => "PBXVariantGroup",
                GroupKind::Synchronized => "PBXFileSystemSynchronizedRootGroup",
            },
            ObjectRecord::File(_) => "PBXFileReference",
            ObjectRecord::Target(_) => "PBXNativeTarget",
            ObjectRecord::Other { isa } => isa,
        }
    }

    /// The name Xcode shows: the explicit `name`, else the last segment of `path`.
    ///
    /// A group anchored outside its parent whose `name` is just the last
    /// segment of its `path` shows the whole `path`.
    pub fn display_name(&self) -> Option<String> {
        if let ObjectRecord::Group(GroupRecord {
            name: Some(name),
            path: Some(path),
            source_tree: SourceTree::SourceRoot | SourceTree::Absolute,
            kind: GroupKind::Virtual | GroupKind::Synchronized,
            ..
        }) = self
        {
            if name == last_segment(path) && name != path {
                return Some(path.clone());
            }
        }
        let (name, path) = match self {
            ObjectRecord::Group(group) => (group.name.as_deref(), group.path.as_deref()),
            ObjectRecord::File(file) => (file.name.as_deref(), file.path.as_deref()),
            ObjectRecord::Target(target) => (Some(target.name.as_str()), None),
            ObjectRecord::Other { .. } => (None, None),
        };
        name.or(path)
            .filter(|s| !s.is_empty())
            .map(|s| last_segment(s).to_string())
    }
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
}

/// The loaded project: every object by identifier, plus the entry points.
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    pub name: String,
    pub main_group: ObjectId,
    /// Target identifiers in the order the project lists them.
    pub targets: Vec<ObjectId>,
    objects: IndexMap<ObjectId, ObjectRecord>,
}

impl ProjectDescriptor {
    pub fn new(name: impl Into<String>, main_group: impl Into<ObjectId>) -> Self {
        Self {
            name: name.into(),
            main_group: main_group.into(),
            targets: Vec::new(),
            objects: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<ObjectId>, record: ObjectRecord) -> &mut Self {
        self.objects.insert(id.into(), record);
        self
    }

    /// Inserts a target and appends it to the project's target list.
    pub fn insert_target(&mut self, id: impl Into<ObjectId>, target: TargetRecord) -> &mut Self {
        let id = id.into();
        self.targets.push(id.clone());
        self.objects.insert(id, ObjectRecord::Target(target));
        self
    }

    pub fn get(&self, id: &str) -> Option<&ObjectRecord> {
        self.objects.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = (&str, &ObjectRecord)> {
        self.objects.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Reads a `project.pbxproj` or its `plutil -convert json` form.
    ///
    /// ASCII, XML and binary property lists are all accepted. The project
    /// name is taken from the enclosing `.xcodeproj` bundle when there is one,
    /// else from the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, XcnavError> {
        let path = path.as_ref();
        #[cfg(feature = "logging")]
        tracing::debug!("Loading project descriptor from {}", path.display());
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut descriptor = if is_json {
            let text = fs::read_to_string(path).map_err(|e| XcnavError::io(path, e))?;
            Self::from_json(&text)?
        } else {
            let bytes = fs::read(path).map_err(|e| XcnavError::io(path, e))?;
            Self::from_plist(&Value::from_reader(Cursor::new(bytes))?)?
        };
        if let Some(name) = project_name_for(path) {
            descriptor.name = name;
        }
        Ok(descriptor)
    }

    /// Parses property-list text.
    pub fn parse(text: &str) -> Result<Self, XcnavError> {
        Self::from_plist(&Value::from_reader(Cursor::new(text.as_bytes()))?)
    }

    pub fn from_json(text: &str) -> Result<Self, XcnavError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_plist(&json_to_plist(value))
    }

    pub fn from_plist(root: &Value) -> Result<Self, XcnavError> {
        let root = root
            .as_dictionary()
            .ok_or_else(|| XcnavError::Descriptor("top level is not a dictionary".into()))?;
        let objects = root
            .get("objects")
            .and_then(Value::as_dictionary)
            .ok_or_else(|| XcnavError::Descriptor("missing 'objects' dictionary".into()))?;
        let root_id = get_str(root, "rootObject")
            .ok_or_else(|| XcnavError::Descriptor("missing 'rootObject'".into()))?;
        let project = objects
            .get(&root_id)
            .and_then(Value::as_dictionary)
            .ok_or_else(|| {
                XcnavError::Descriptor(format!("root object {} is not defined", root_id))
            })?;
        match get_str(project, "isa").as_deref() {
            Some("PBXProject") => {}
            other => {
                return Err(XcnavError::Descriptor(format!(
                    "root object {} is {}, expected PBXProject",
                    root_id,
                    other.unwrap_or("untyped")
                )));
            }
        }
        let main_group = get_str(project, "mainGroup")
            .ok_or_else(|| XcnavError::Descriptor("project has no 'mainGroup'".into()))?;

        let mut descriptor = ProjectDescriptor::new("Project", main_group);
        descriptor.targets = get_str_array(project, "targets");
        for (id, object) in objects {
            let record = match object.as_dictionary() {
                Some(object) => convert_object(object, objects),
                None => ObjectRecord::Other {
                    isa: String::new(),
                },
            };
            descriptor.objects.insert(id.clone(), record);
        }
        #[cfg(feature = "logging")]
        tracing::debug!(
            "Loaded {} objects, {} targets",
            descriptor.objects.len(),
            descriptor.targets.len()
        );
        Ok(descriptor)
    }
}

/// Scalar value as text. ASCII plists only have strings, the other forms
/// may carry numbers or booleans for the same keys.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(r) => Some(r.to_string()),
        Value::Boolean(b) => Some(if *b { "YES" } else { "NO" }.to_string()),
        _ => None,
    }
}

fn get_str(dict: &Dictionary, key: &str) -> Option<String> {
    dict.get(key).and_then(scalar)
}

fn get_str_array(dict: &Dictionary, key: &str) -> Vec<String> {
    dict.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(scalar).collect())
        .unwrap_or_default()
}

fn json_to_plist(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::String(String::new()),
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::String(n.to_string()),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(json_to_plist).collect())
        }
        serde_json::Value::Object(map) => {
            let mut dict = Dictionary::new();
            for (key, value) in map {
                dict.insert(key, json_to_plist(value));
            }
            Value::Dictionary(dict)
        }
    }
}

fn project_name_for(path: &Path) -> Option<String> {
    let bundle = path
        .ancestors()
        .find(|p| p.extension().is_some_and(|ext| ext == "xcodeproj"));
    bundle
        .and_then(Path::file_stem)
        .or_else(|| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
}

fn convert_object(object: &Dictionary, objects: &Dictionary) -> ObjectRecord {
    let isa = get_str(object, "isa").unwrap_or_default();
    let name = get_str(object, "name");
    let path = get_str(object, "path");
    let source_tree = SourceTree::parse(get_str(object, "sourceTree").as_deref());
    let kind = match isa.as_str() {
        "PBXGroup" => Some(GroupKind::Virtual),
        "PBXVariantGroup" => Some(GroupKind::Variant),
        "PBXFileSystemSynchronizedRootGroup" => Some(GroupKind::Synchronized),
        _ => None,
    };
    if let Some(kind) = kind {
        return ObjectRecord::Group(GroupRecord {
            name,
            path,
            source_tree,
            children: get_str_array(object, "children"),
            kind,
        });
    }
    match isa.as_str() {
        // Core Data model versions and cross-project proxies display as single files.
        "PBXFileReference" | "XCVersionGroup" | "PBXReferenceProxy" => {
            ObjectRecord::File(FileRecord {
                name,
                path,
                source_tree,
            })
        }
        "PBXNativeTarget" | "PBXAggregateTarget" | "PBXLegacyTarget" => {
            ObjectRecord::Target(TargetRecord {
                name: name
                    .or_else(|| get_str(object, "productName"))
                    .unwrap_or_default(),
                product_reference: get_str(object, "productReference"),
                source_files: sources_phase_files(object, objects),
                synchronized_groups: get_str_array(object, "fileSystemSynchronizedGroups"),
            })
        }
        _ => ObjectRecord::Other { isa },
    }
}

/// File references of the target's first `PBXSourcesBuildPhase`.
fn sources_phase_files(target: &Dictionary, objects: &Dictionary) -> Vec<ObjectId> {
    let phase = get_str_array(target, "buildPhases")
        .into_iter()
        .filter_map(|id| objects.get(&id).and_then(Value::as_dictionary))
        .find(|phase| get_str(phase, "isa").as_deref() == Some("PBXSourcesBuildPhase"));
    let Some(phase) = phase else {
        return Vec::new();
    };
    get_str_array(phase, "files")
        .into_iter()
        .filter_map(|id| objects.get(&id).and_then(Value::as_dictionary))
        .filter_map(|build_file| get_str(build_file, "fileRef"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"// !$*UTF8*$!
{
    archiveVersion = 1;
    objects = {
        P0 /* Project object */ = {isa = PBXProject; mainGroup = G0; targets = (T1, ); };
        G0 = {isa = PBXGroup; children = (G1, S1, V1, M1, F9, ); sourceTree = "<group>"; };
        G1 /* Views */ = {
            isa = PBXGroup;
            name = Views;
            children = (
                F1 /* A.swift */,
            );
            sourceTree = "<group>";
        };
        S1 = {isa = PBXFileSystemSynchronizedRootGroup; path = Sources; sourceTree = "<group>"; };
        V1 /* Localizable.strings */ = {isa = PBXVariantGroup; children = (F2, F3, ); name = Localizable.strings; sourceTree = "<group>"; };
        M1 /* Model.xcdatamodeld */ = {isa = XCVersionGroup; children = (F4, ); currentVersion = F4; path = Model.xcdatamodeld; sourceTree = "<group>"; versionGroupType = wrapper.xcdatamodel; };
        F1 = {isa = PBXFileReference; path = A.swift; sourceTree = "<group>"; };
        F2 = {isa = PBXFileReference; name = en; path = en.lproj/Localizable.strings; sourceTree = "<group>"; };
        F3 = {isa = PBXFileReference; name = "pt-BR"; path = "pt-BR.lproj/Localizable.strings"; sourceTree = "<group>"; };
        F4 = {isa = PBXFileReference; path = Model.xcdatamodel; sourceTree = "<group>"; };
        F5 = {isa = PBXFileReference; name = libz.tbd; path = /usr/lib/libz.tbd; sourceTree = "<absolute>"; };
        F9 = {isa = PBXFileReference; path = Core.framework; sourceTree = BUILT_PRODUCTS_DIR; };
        B1 = {isa = PBXBuildFile; fileRef = F1; };
        P1 = {isa = PBXSourcesBuildPhase; files = (B1, ); };
        T1 = {isa = PBXNativeTarget; name = Core; buildPhases = (P1, ); productReference = F9; fileSystemSynchronizedGroups = (S1, ); };
        X1 = {isa = XCBuildConfiguration; name = Debug; };
    };
    rootObject = P0 /* Project object */;
}
"#;

    #[test]
    fn converts_records() {
        let d = ProjectDescriptor::parse(PROJECT).unwrap();
        assert_eq!(d.main_group, "G0");
        assert_eq!(d.targets, vec!["T1"]);
        match d.get("G0") {
            Some(ObjectRecord::Group(g)) => {
                assert_eq!(g.children, vec!["G1", "S1", "V1", "M1", "F9"]);
                assert_eq!(g.source_tree, SourceTree::Group);
            }
            other => panic!("unexpected record: {other:?}"),
        }
        match d.get("S1") {
            Some(ObjectRecord::Group(g)) => {
                assert_eq!(g.kind, GroupKind::Synchronized);
                assert_eq!(g.path.as_deref(), Some("Sources"));
            }
            other => panic!("unexpected record: {other:?}"),
        }
        match d.get("T1") {
            Some(ObjectRecord::Target(t)) => {
                assert_eq!(t.name, "Core");
                assert_eq!(t.product_reference.as_deref(), Some("F9"));
                assert_eq!(t.source_files, vec!["F1"]);
                assert_eq!(t.synchronized_groups, vec!["S1"]);
            }
            other => panic!("unexpected record: {other:?}"),
        }
        assert_eq!(d.get("X1").map(ObjectRecord::isa), Some("XCBuildConfiguration"));
    }

    #[test]
    fn variant_and_version_groups() {
        let d = ProjectDescriptor::parse(PROJECT).unwrap();
        match d.get("V1") {
            Some(ObjectRecord::Group(g)) => {
                assert_eq!(g.kind, GroupKind::Variant);
                assert_eq!(g.children, vec!["F2", "F3"]);
            }
            other => panic!("unexpected record: {other:?}"),
        }
        assert_eq!(
            d.get("F3").and_then(ObjectRecord::display_name).as_deref(),
            Some("pt-BR")
        );
        let model = d.get("M1").unwrap();
        assert_eq!(model.display_name().as_deref(), Some("Model.xcdatamodeld"));
        match model {
            ObjectRecord::File(f) => assert_eq!(f.path.as_deref(), Some("Model.xcdatamodeld")),
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn keeps_object_order_and_unquoted_paths() {
        let d = ProjectDescriptor::parse(PROJECT).unwrap();
        let ids: Vec<_> = d.objects().map(|(id, _)| id).take(4).collect();
        assert_eq!(ids, vec!["P0", "G0", "G1", "S1"]);
        match d.get("F5") {
            Some(ObjectRecord::File(f)) => {
                assert_eq!(f.path.as_deref(), Some("/usr/lib/libz.tbd"));
                assert_eq!(f.source_tree, SourceTree::Absolute);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn reads_xml_form() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>objects</key>
    <dict>
        <key>P0</key>
        <dict><key>isa</key><string>PBXProject</string><key>mainGroup</key><string>G0</string></dict>
        <key>G0</key>
        <dict><key>isa</key><string>PBXGroup</string><key>children</key><array/></dict>
    </dict>
    <key>rootObject</key>
    <string>P0</string>
</dict>
</plist>
"#;
        let d = ProjectDescriptor::parse(xml).unwrap();
        assert_eq!(d.main_group, "G0");
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn malformed_text_is_a_plist_error() {
        let err = ProjectDescriptor::parse("{\n  a = 1;\n  b = 2\n").unwrap_err();
        assert!(matches!(err, XcnavError::Plist(_)));
    }

    #[test]
    fn unknown_source_tree_is_none() {
        assert_eq!(SourceTree::parse(Some("BUILT_PRODUCTS_DIR")), SourceTree::None);
        assert_eq!(SourceTree::parse(None), SourceTree::None);
        assert_eq!(SourceTree::parse(Some("<group>")), SourceTree::Group);
    }

    #[test]
    fn display_name_prefers_name_then_last_path_segment() {
        let named = ObjectRecord::Group(GroupRecord::new(GroupKind::Virtual).name("UI").path("src/ui"));
        let pathed = ObjectRecord::File(FileRecord::new("src/ui/View.swift", SourceTree::Group));
        let bare = ObjectRecord::Group(GroupRecord::new(GroupKind::Virtual));
        assert_eq!(named.display_name().as_deref(), Some("UI"));
        assert_eq!(pathed.display_name().as_deref(), Some("View.swift"));
        assert_eq!(bare.display_name(), None);
    }

    #[test]
    fn rooted_folder_named_after_its_path_shows_the_path() {
        let rooted = GroupRecord::new(GroupKind::Synchronized)
            .name("Shared")
            .path("../Common/Shared")
            .source_tree(SourceTree::SourceRoot);
        assert_eq!(
            ObjectRecord::Group(rooted.clone()).display_name().as_deref(),
            Some("../Common/Shared")
        );
        let relative = rooted.source_tree(SourceTree::Group);
        assert_eq!(
            ObjectRecord::Group(relative).display_name().as_deref(),
            Some("Shared")
        );
    }

    #[test]
    fn rejects_missing_root_object() {
        let err = ProjectDescriptor::parse("{ objects = {}; }").unwrap_err();
        assert!(matches!(err, XcnavError::Descriptor(_)));
    }

    #[test]
    fn reads_json_form() {
        let json = r#"{"objects":{"P0":{"isa":"PBXProject","mainGroup":"G0"},"G0":{"isa":"PBXGroup","children":[]}},"rootObject":"P0"}"#;
        let d = ProjectDescriptor::from_json(json).unwrap();
        assert_eq!(d.main_group, "G0");
        assert_eq!(d.len(), 2);
    }
}
