/*!
 * Tests for the rewrite style catalog surface
 */

use std::str::FromStr;

use creatorflow::translation::RewriteStyle;

/// Test the catalog lists every style exactly once
#[test]
fn test_variants_withFullCatalog_shouldListAllFiveStyles() {
    let variants = RewriteStyle::variants();

    assert_eq!(variants.len(), 5);
    assert_eq!(variants[0], RewriteStyle::Pure);
    assert!(variants.contains(&RewriteStyle::Insights));
    assert!(variants.contains(&RewriteStyle::Hooks));
    assert!(variants.contains(&RewriteStyle::Recap));
    assert!(variants.contains(&RewriteStyle::MusicGuide));
}

/// Test identifier and display name pairs
#[test]
fn test_names_withEachStyle_shouldMatchCliIdentifiers() {
    assert_eq!(RewriteStyle::Pure.as_str(), "pure");
    assert_eq!(RewriteStyle::Insights.as_str(), "insights");
    assert_eq!(RewriteStyle::Hooks.as_str(), "hooks");
    assert_eq!(RewriteStyle::Recap.as_str(), "recap");
    assert_eq!(RewriteStyle::MusicGuide.as_str(), "music-guide");

    assert_eq!(RewriteStyle::MusicGuide.display_name(), "Music Guide");
}

/// Test the default style
#[test]
fn test_default_withNoSelection_shouldBePure() {
    assert_eq!(RewriteStyle::default(), RewriteStyle::Pure);
}

/// Test Display and FromStr agree for every style
#[test]
fn test_round_trip_withEachStyle_shouldParseItsOwnDisplay() {
    for style in RewriteStyle::variants() {
        let parsed = RewriteStyle::from_str(&style.to_string()).unwrap();
        assert_eq!(parsed, style);
    }
}
