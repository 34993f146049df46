//! Integration tests for the yamlmend configuration updater

mod config_loading;
mod ignored_sections;
mod template_sources;
mod test_utils;
