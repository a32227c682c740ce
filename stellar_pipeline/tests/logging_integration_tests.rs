//! Integration tests for builder diagnostics
//!
//! Verifies what the builder reports through the global logger.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use stellar_pipeline::stellar::log::{self, LogEntry, LogSeverity, Logger};
use stellar_pipeline::stellar::{
    DeviceCapabilities, Error, MockGraphicsDevice, PipelineDescriptionBuilder, ShaderBytecode,
    ShaderStage,
};
use stellar_pipeline::stellar::vertex::{VertexElementKind, VertexInputRate};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn builder_with_framebuffer() -> PipelineDescriptionBuilder {
    let mut device = MockGraphicsDevice::new(DeviceCapabilities::default());
    let framebuffer = device.create_framebuffer("main");
    let mut builder = PipelineDescriptionBuilder::new(DeviceCapabilities::default());
    builder.set_framebuffer(framebuffer);
    builder
}

fn count(entries: &[LogEntry], severity: LogSeverity) -> usize {
    entries.iter().filter(|entry| entry.severity == severity).count()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_build_logs_summary() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut builder = builder_with_framebuffer();
    builder
        .add_shader_stage(ShaderBytecode::new(ShaderStage::Vertex, vec![1, 2, 3, 4]))
        .add_shader_stage(ShaderBytecode::new(ShaderStage::Fragment, vec![1, 2, 3, 4]));
    builder.build().unwrap();

    let captured = entries.lock().unwrap();
    let summary = captured
        .iter()
        .find(|entry| entry.severity == LogSeverity::Info)
        .expect("build should log a summary");
    assert_eq!(summary.source, "stellar::PipelineBuilder");
    assert!(summary.message.contains("2 stages"));
    assert_eq!(count(&captured, LogSeverity::Warn), 0);
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_fragment_only_warns() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut builder = builder_with_framebuffer();
    builder.add_shader_stage(ShaderBytecode::new(ShaderStage::Fragment, vec![1, 2, 3, 4]));
    assert!(builder.build().is_ok());

    let captured = entries.lock().unwrap();
    assert_eq!(count(&captured, LogSeverity::Warn), 1);
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_vertex_layout_warnings() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut builder = builder_with_framebuffer();
    builder
        .add_shader_stage(ShaderBytecode::new(ShaderStage::Vertex, vec![1, 2, 3, 4]))
        .add_vertex_binding(0, VertexInputRate::Vertex, 8);
    builder.add_vertex_attribute(VertexElementKind::Position, 0);
    builder.add_vertex_attribute(VertexElementKind::Color, 3);
    assert!(builder.build().is_ok());

    let captured = entries.lock().unwrap();
    let warnings: Vec<&LogEntry> = captured
        .iter()
        .filter(|entry| entry.severity == LogSeverity::Warn)
        .collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().any(|entry| entry.message.contains("stride 8")));
    assert!(warnings.iter().any(|entry| entry.message.contains("undeclared binding 3")));
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_errors_carry_file_and_line() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let builder = PipelineDescriptionBuilder::new(DeviceCapabilities::default());
    assert_eq!(builder.build(), Err(Error::MissingFramebuffer));

    let captured = entries.lock().unwrap();
    let errors: Vec<&LogEntry> = captured
        .iter()
        .filter(|entry| entry.severity == LogSeverity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, Error::MissingFramebuffer.to_string());
    assert!(errors[0].file.is_some_and(|file| file.ends_with("pipeline.rs")));
    assert!(errors[0].line.is_some());
    drop(captured);

    log::reset_logger();
}
