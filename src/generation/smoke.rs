//! Smoke test code synthesis
//!
//! Renders one Go integration test function per resolvable smoke test case,
//! prefixed by the import block the functions need.

use std::collections::BTreeSet;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, info};

use crate::core::config::DEFAULT_SDK_IMPORT_ROOT;
use crate::core::error::Result;
use crate::generation::encoder::ShapeValueBuilder;
use crate::generation::suite::SmokeTestSuite;
use crate::generation::utils::go_string_literal;
use crate::model::Api;

const TEMPLATE_NAME: &str = "smoke_test.go.tera";
const TEMPLATE: &str = include_str!("templates/smoke_test.go.tera");

/// Keeps SDK packages referenced even when no rendered test uses them
const IGNORE_IMPORTS: &str = "
var _ aws.Config
var _ awserr.Error
var _ request.Request
";

/// Deduplicated Go import paths, standard library first
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    std: BTreeSet<String>,
    external: BTreeSet<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_import(&mut self, path: impl Into<String>) {
        let path = path.into();
        // Go standard library paths never carry a domain in their first element
        let is_std = path
            .split('/')
            .next()
            .is_some_and(|first| !first.contains('.'));
        if is_std {
            self.std.insert(path);
        } else {
            self.external.insert(path);
        }
    }

    pub fn len(&self) -> usize {
        self.std.len() + self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `import (...)` block, groups separated by a blank line
    pub fn to_go_code(&self) -> String {
        let groups: Vec<String> = [&self.std, &self.external]
            .into_iter()
            .filter(|group| !group.is_empty())
            .map(|group| {
                group
                    .iter()
                    .map(|path| format!("\t{}\n", go_string_literal(path)))
                    .collect::<String>()
            })
            .collect();
        format!("import (\n{})\n", groups.join("\n"))
    }
}

#[derive(Debug, Serialize)]
struct CaseContext {
    index: String,
    exported_name: String,
    params: String,
    expect_error: bool,
}

/// Synthesizes smoke test source for one service
#[derive(Debug, Clone)]
pub struct SmokeTestGenerator {
    sdk_import_root: String,
}

impl Default for SmokeTestGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SDK_IMPORT_ROOT)
    }
}

impl SmokeTestGenerator {
    pub fn new(sdk_import_root: impl Into<String>) -> Self {
        Self {
            sdk_import_root: sdk_import_root.into().trim_end_matches('/').to_string(),
        }
    }

    /// Imports every generated smoke test file needs
    pub fn imports(&self, api: &Api) -> ImportSet {
        let mut imports = ImportSet::new();
        for path in ["context", "testing", "time"] {
            imports.add_import(path);
        }
        for sdk_path in [
            "aws",
            "aws/awserr",
            "aws/request",
            "awstesting/integration",
        ] {
            imports.add_import(format!("{}/{sdk_path}", self.sdk_import_root));
        }
        imports.add_import(api.import_path(&self.sdk_import_root));
        imports
    }

    /// Renders the import block followed by one test function per case.
    ///
    /// Cases whose operation the model does not define are skipped; the
    /// remaining ones are numbered by their position among emitted cases.
    pub fn synthesize(&self, suite: &SmokeTestSuite, api: &Api) -> Result<String> {
        let builder = ShapeValueBuilder::new(api.package_name()).with_base_indent(1);

        let mut cases = Vec::new();
        for case in &suite.test_cases {
            let Some(op) = api.operation(&case.operation_name) else {
                debug!(operation = %case.operation_name, "skipping smoke test for unknown operation");
                continue;
            };
            cases.push(CaseContext {
                index: format!("{:02}", cases.len()),
                exported_name: op.exported_name(),
                params: builder.encode_input(&case.input, &op.input)?,
                expect_error: case.expect_error,
            });
        }

        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

        let mut context = Context::new();
        context.insert("package_name", api.package_name());
        context.insert("default_region", &go_string_literal(&suite.default_region));
        context.insert("cases", &cases);
        let functions = tera.render(TEMPLATE_NAME, &context)?;

        info!(
            service = %api.package_name(),
            emitted = cases.len(),
            skipped = suite.test_cases.len() - cases.len(),
            "synthesized smoke tests"
        );

        Ok(format!(
            "{}{IGNORE_IMPORTS}{functions}",
            self.imports(api).to_go_code()
        ))
    }
}

/// Synthesizes smoke tests against the default SDK import root
pub fn synthesize(suite: &SmokeTestSuite, api: &Api) -> Result<String> {
    SmokeTestGenerator::default().synthesize(suite, api)
}

/// Wraps synthesized smoke tests into a complete Go test file
pub fn render_test_file(api: &Api, body: &str) -> String {
    format!(
        "// Code generated by smokegen. DO NOT EDIT.\n\n\
         //go:build go1.15 && integration\n\
         // +build go1.15,integration\n\n\
         package {}_test\n\n{body}",
        api.package_name()
    )
}
