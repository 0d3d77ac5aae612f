// tests/merge_test.rs
use release_notes_sync::merge::insert_fragment;

#[test]
fn test_fragment_lands_before_existing_history() {
    let document = "intro\n## 2025-10-01\nold";
    let fragment = "## 2025-11-30\n### v0.45.0\n- **新增** X";

    assert_eq!(
        insert_fragment(document, fragment),
        "intro\n## 2025-11-30\n### v0.45.0\n- **新增** X\n\n## 2025-10-01\nold"
    );
}

#[test]
fn test_document_without_history_appends_at_end() {
    let document = "# Ghippo Release Notes\n\nThis page tracks published releases.";
    let fragment = "## 2025-11-30\n### v0.45.0\n- **修复** login";

    let merged = insert_fragment(document, fragment);
    assert!(merged.starts_with(document));
    assert!(merged.ends_with("\n\n## 2025-11-30\n### v0.45.0\n- **修复** login"));
}

#[test]
fn test_merges_compose_without_corrupting_prior_entries() {
    let original = "intro\n\n## 2025-09-15\n### v0.43.0\n- **修复** A";

    let once = insert_fragment(original, "## 2025-10-20\n### v0.44.0\n- **优化** B");
    let twice = insert_fragment(&once, "## 2025-11-30\n### v0.45.0\n- **新增** C");

    assert_eq!(
        twice,
        "intro\n\
         \n\
         ## 2025-11-30\n### v0.45.0\n- **新增** C\n\
         \n\
         ## 2025-10-20\n### v0.44.0\n- **优化** B\n\
         \n\
         ## 2025-09-15\n### v0.43.0\n- **修复** A"
    );

    // Everything at and after the original first dated heading survived
    // both merges unchanged.
    assert!(twice.ends_with("## 2025-09-15\n### v0.43.0\n- **修复** A"));
}

#[test]
fn test_bytes_outside_the_insertion_are_preserved() {
    // Trailing spaces, tabs and blank lines around the boundary must all
    // survive; this file is edited by humans too.
    let document = "title  \n\tnote\n\n## 2025-01-02 \nbody\n";
    let merged = insert_fragment(document, "F");
    assert_eq!(merged, "title  \n\tnote\n\nF\n\n## 2025-01-02 \nbody\n");
}

#[test]
fn test_expected_fragment_shape_passes_through_untouched() {
    let fragment = "## 2025-11-30\n### v0.45.0\n\n- **新增** (CSP) 支持用户邀请注册身份绑定功能 API\n- **优化** 优化短信通道的配置方式\n- **修复** 修复忘记密码短时间发送失败问题";
    let merged = insert_fragment("intro\n## 2025-10-01\nold", fragment);
    assert!(merged.contains(fragment));
}
