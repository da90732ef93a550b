pub const PHENOSEQ_DISPLAY_VERSION: &str = env!("PHENOSEQ_DISPLAY_VERSION");
pub const PHENOSEQ_BUILD_N: &str = env!("PHENOSEQ_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "phenoseq {}\nBuild {}\nLineage phenotype-state slicing and layout",
        PHENOSEQ_DISPLAY_VERSION, PHENOSEQ_BUILD_N
    )
}
