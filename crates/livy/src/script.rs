//! The PySpark program submitted as the Livy statement.

use crate::error::{LivyError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tera::Tera;

const DEFAULT_TEMPLATE: &str = r#"from pyspark.sql import SparkSession

spark = SparkSession.builder \
    .appName("{{ app_name }}") \
    .config("spark.sql.catalog.{{ catalog }}", "org.apache.iceberg.spark.SparkCatalog") \
    .config("spark.sql.catalog.{{ catalog }}.type", "{{ catalog_type }}") \
    .config("spark.sql.catalog.{{ catalog }}.uri", "{{ metastore_uri }}") \
    .config("spark.sql.catalog.{{ catalog }}.warehouse", "{{ warehouse }}") \
    .getOrCreate()

df = spark.read.option("multiline", "{{ multiline }}").json("{{ source_path }}")

df.writeTo("{{ catalog }}.{{ table }}").using("iceberg").createOrReplace()
"#;

/// Load JSON files from HDFS into an Iceberg table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SparkJob {
    pub app_name: String,
    pub catalog: String,
    pub catalog_type: String,
    pub metastore_uri: String,
    pub warehouse: String,
    pub source_path: String,
    /// `database.table` inside the catalog.
    pub table: String,
    pub multiline: bool,
    /// Replaces the built-in template. Rendered with the fields above.
    pub template_path: Option<PathBuf>,
}

impl Default for SparkJob {
    fn default() -> Self {
        Self {
            app_name: "LoadE911JSONToIceberg".to_string(),
            catalog: "hive_catalog".to_string(),
            catalog_type: "hive".to_string(),
            metastore_uri: "thrift://localhost:9083".to_string(),
            warehouse: "hdfs:///warehouse/tables".to_string(),
            source_path: "hdfs:///tmp/e911".to_string(),
            table: "default.e911_calls".to_string(),
            multiline: true,
            template_path: None,
        }
    }
}

impl SparkJob {
    /// Values are pasted into Python string literals, so quotes,
    /// backslashes and line breaks are rejected.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("app_name", &self.app_name),
            ("catalog", &self.catalog),
            ("catalog_type", &self.catalog_type),
            ("metastore_uri", &self.metastore_uri),
            ("warehouse", &self.warehouse),
            ("source_path", &self.source_path),
            ("table", &self.table),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(LivyError::Configuration(format!("job.{name} cannot be empty")));
            }
            if value.contains(['"', '\'', '\\', '\n', '\r']) {
                return Err(LivyError::Configuration(format!(
                    "job.{name} contains a quote, backslash or line break: {value:?}"
                )));
            }
        }
        Ok(())
    }

    pub fn render(&self) -> Result<String> {
        self.validate()?;
        let template = match &self.template_path {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEFAULT_TEMPLATE.to_string(),
        };
        let context = tera::Context::from_serialize(self)?;
        Ok(Tera::one_off(&template, &context, false)?)
    }
}
