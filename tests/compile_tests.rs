//! End-to-end compilation tests
//!
//! Compiles the fixture definition files into a temporary directory and
//! checks the generated classes.

use std::fs;
use std::path::{Path, PathBuf};

use php_defgen::{
    compile, CompileOptions, Definition, Loader, NamespacePrefix, PropertyTarget, SchemaError,
};
use regex::Regex;
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("missing generated file {}: {}", relative, e))
}

/// Relative paths of every file under `root`, sorted
fn tree(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

/// (name, element type, is_array) from the constructor docblock
fn documented_parameters(source: &str) -> Vec<(String, String, bool)> {
    let param = Regex::new(r"@param (\S+) \$(\w+)").unwrap();
    let array = Regex::new(r"^array<(.+)>$").unwrap();
    param
        .captures_iter(source)
        .map(|c| {
            let doc_type = &c[1];
            match array.captures(doc_type) {
                Some(inner) => (c[2].to_string(), inner[1].to_string(), true),
                None => (c[2].to_string(), doc_type.to_string(), false),
            }
        })
        .collect()
}

/// (declared type, name) from the constructor signature
fn declared_parameters(source: &str) -> Vec<(String, String)> {
    let declared = Regex::new(r"public readonly (\S+) \$(\w+),").unwrap();
    declared
        .captures_iter(source)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

/// (name, element type, is_array) as the Definition declares them
fn expected_parameters(definition: &Definition, prefix: &NamespacePrefix) -> Vec<(String, String, bool)> {
    definition
        .properties
        .iter()
        .map(|(name, property)| {
            let type_name = match &property.target {
                PropertyTarget::TypeName(type_name) => type_name.clone(),
                PropertyTarget::Nested(nested) => prefix.class_reference(nested),
            };
            (name.clone(), type_name, property.is_array)
        })
        .collect()
}

// =============================================================================
// Nested definitions
// =============================================================================

#[test]
fn test_user_picture_rectangle() {
    let out = TempDir::new().unwrap();
    let report = compile(&CompileOptions::new(fixtures_path().join("user.d.php"), out.path())).unwrap();

    assert_eq!(report.definitions, 1);
    assert_eq!(report.files.len(), 3);
    assert_eq!(tree(out.path()), vec!["Picture.php", "Rectangle.php", "User.php"]);

    let user = read(out.path(), "User.php");
    assert!(!user.contains("namespace"));
    assert!(user.contains("class User\n"));
    assert_eq!(
        documented_parameters(&user),
        vec![("picture".to_string(), "\\Picture".to_string(), false)]
    );

    let picture = read(out.path(), "Picture.php");
    assert_eq!(
        declared_parameters(&picture),
        vec![
            ("string".to_string(), "contents".to_string()),
            ("\\Rectangle".to_string(), "size".to_string()),
        ]
    );

    let rectangle = read(out.path(), "Rectangle.php");
    assert_eq!(
        declared_parameters(&rectangle),
        vec![
            ("int".to_string(), "width".to_string()),
            ("int".to_string(), "height".to_string()),
        ]
    );
}

#[test]
fn test_directory_with_namespaces_and_imports() {
    let out = TempDir::new().unwrap();
    let report = compile(&CompileOptions::new(fixtures_path().join("definitions"), out.path())).unwrap();

    assert_eq!(report.definitions, 3);
    assert_eq!(
        tree(out.path()),
        vec![
            "Media/Picture.php",
            "Media/Tag.php",
            "Models/Account.php",
            "Models/Album.php",
            "Models/Profile.php",
        ]
    );

    let account = read(out.path(), "Models/Account.php");
    assert!(account.contains("namespace Models;\n"));
    assert_eq!(
        documented_parameters(&account),
        vec![
            ("id".to_string(), "int".to_string(), false),
            ("avatar".to_string(), "\\Media\\Picture".to_string(), false),
            ("tags".to_string(), "\\Media\\Tag".to_string(), true),
            ("profile".to_string(), "\\Models\\Profile".to_string(), false),
            ("albums".to_string(), "\\Models\\Album".to_string(), true),
        ]
    );
    assert!(account.contains("public readonly array $albums,"));

    let profile = read(out.path(), "Models/Profile.php");
    assert!(profile.contains("public readonly \\DateTimeImmutable $created,"));
}

// =============================================================================
// Namespace prefix
// =============================================================================

#[test]
fn test_empty_and_separator_prefixes_emit_no_namespace() {
    for prefix in ["", "\\", "  \\ "] {
        let out = TempDir::new().unwrap();
        let options = CompileOptions::new(fixtures_path().join("user.d.php"), out.path())
            .with_namespace_prefix(prefix);
        compile(&options).unwrap();
        let user = read(out.path(), "User.php");
        assert!(!user.contains("namespace"), "prefix {:?} emitted a namespace", prefix);
    }
}

#[test]
fn test_prefix_is_applied_to_namespace_and_references() {
    let out = TempDir::new().unwrap();
    let options = CompileOptions::new(fixtures_path().join("definitions"), out.path())
        .with_namespace_prefix("App");
    compile(&options).unwrap();

    // Paths mirror the unprefixed namespace
    let account = read(out.path(), "Models/Account.php");
    assert!(account.contains("namespace App\\Models;\n"));
    assert!(account.contains("@param \\App\\Models\\Profile $profile"));
    assert!(account.contains("@param array<\\App\\Models\\Album> $albums"));
    assert!(!account.contains("\\\\"));

    let user_out = TempDir::new().unwrap();
    compile(
        &CompileOptions::new(fixtures_path().join("user.d.php"), user_out.path())
            .with_namespace_prefix("App\\"),
    )
    .unwrap();
    let user = read(user_out.path(), "User.php");
    assert!(user.contains("namespace App;\n"));
    assert!(user.contains("public readonly \\App\\Picture $picture,"));
}

#[test]
fn test_mutable_properties() {
    let out = TempDir::new().unwrap();
    let options = CompileOptions::new(fixtures_path().join("user.d.php"), out.path()).with_readonly(false);
    compile(&options).unwrap();

    let rectangle = read(out.path(), "Rectangle.php");
    assert!(rectangle.contains("        public int $width,\n"));
    assert!(!rectangle.contains("readonly"));
}

// =============================================================================
// Round trip and idempotence
// =============================================================================

#[test]
fn test_constructor_signature_round_trips() {
    let input = fixtures_path().join("definitions");
    let out = TempDir::new().unwrap();
    let prefix = NamespacePrefix::new("App");
    compile(&CompileOptions::new(&input, out.path()).with_namespace_prefix("App")).unwrap();

    let mut pending: Vec<Definition> = Loader::default().load(&input).unwrap();
    let mut checked = 0;
    while let Some(definition) = pending.pop() {
        let source = read(out.path(), &format!("{}.php", definition.relative_path()));
        assert_eq!(
            documented_parameters(&source),
            expected_parameters(&definition, &prefix),
            "{} does not match its definition",
            definition.qualified_name()
        );
        assert_eq!(declared_parameters(&source).len(), definition.properties.len());
        pending.extend(definition.nested().cloned());
        checked += 1;
    }
    assert_eq!(checked, 5);
}

#[test]
fn test_rerun_is_byte_identical() {
    let input = fixtures_path().join("definitions");
    let out = TempDir::new().unwrap();
    let options = CompileOptions::new(&input, out.path()).with_namespace_prefix("App");

    compile(&options).unwrap();
    let first: Vec<(String, String)> = tree(out.path())
        .into_iter()
        .map(|f| {
            let text = read(out.path(), &f);
            (f, text)
        })
        .collect();

    compile(&options).unwrap();
    let second: Vec<(String, String)> = tree(out.path())
        .into_iter()
        .map(|f| {
            let text = read(out.path(), &f);
            (f, text)
        })
        .collect();

    assert_eq!(first, second);
}

// =============================================================================
// Errors
// =============================================================================

fn compile_invalid(name: &str) -> SchemaError {
    let out = TempDir::new().unwrap();
    compile(&CompileOptions::new(fixtures_path().join("invalid").join(name), out.path())).unwrap_err()
}

#[test]
fn test_two_labels_in_a_row_fails() {
    let err = compile_invalid("two_labels.d.php");
    assert!(matches!(err, SchemaError::Structure { .. }));
    assert_eq!(err.line(), Some(4));
    assert!(err.file().unwrap().ends_with("two_labels.d.php"));
}

#[test]
fn test_match_without_label_fails() {
    let err = compile_invalid("missing_label.d.php");
    assert!(err.to_string().contains("preceded by a label"));
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_cyclic_nesting_fails() {
    let err = compile_invalid("cyclic.d.php");
    match err {
        SchemaError::CyclicDefinition { type_name, chain, .. } => {
            assert_eq!(type_name, "Node");
            assert_eq!(chain, "Node -> Node");
        }
        other => panic!("expected cyclic definition, got {:?}", other),
    }
}

#[test]
fn test_invalid_directory_aborts_whole_run() {
    let out = TempDir::new().unwrap();
    let result = compile(&CompileOptions::new(fixtures_path().join("invalid"), out.path()));
    assert!(result.is_err());
}
