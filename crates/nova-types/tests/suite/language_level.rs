use nova_types::{FeatureAvailability, JavaFeature, JavaLanguageLevel};
use pretty_assertions::assert_eq;

#[test]
fn private_interface_methods_start_at_java_9() {
    assert!(!JavaLanguageLevel::JAVA_8.supports_private_interface_methods());
    assert!(JavaLanguageLevel::JAVA_9.supports_private_interface_methods());
    assert!(JavaLanguageLevel::JAVA_21.supports_private_interface_methods());
}

#[test]
fn strictfp_becomes_redundant_at_java_17() {
    assert!(!JavaLanguageLevel::JAVA_11.strictfp_is_redundant());
    assert!(!JavaLanguageLevel::new(16).strictfp_is_redundant());
    assert!(JavaLanguageLevel::JAVA_17.strictfp_is_redundant());
}

#[test]
fn preview_flag_does_not_unlock_future_features() {
    let level = JavaLanguageLevel::JAVA_8.with_preview(true);
    assert_eq!(
        level.availability(JavaFeature::PrivateInterfaceMethods),
        FeatureAvailability::Unavailable
    );
    assert!(!level.strictfp_is_redundant());
    assert_eq!(JavaLanguageLevel::default(), JavaLanguageLevel::JAVA_21);
}
