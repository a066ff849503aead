//! PHP Class Emitter
//!
//! Renders one immutable data class: an optional namespace declaration and
//! a class whose constructor promotes every property, documented with one
//! `@param` line per property.

/// One promoted constructor parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// Resolved type of a single element
    pub type_name: String,
    pub is_array: bool,
}

impl Parameter {
    /// Type as documented in the docblock (`array<T>` for sequences)
    pub fn doc_type(&self) -> String {
        if self.is_array {
            format!("array<{}>", self.type_name)
        } else {
            self.type_name.clone()
        }
    }

    /// Type as declared in the signature
    pub fn declared_type(&self) -> &str {
        if self.is_array {
            "array"
        } else {
            &self.type_name
        }
    }
}

/// Everything needed to render one class
#[derive(Debug, Clone)]
pub struct ClassSource<'a> {
    /// Already prefixed, empty for the root namespace
    pub namespace: &'a str,
    pub class_name: &'a str,
    pub parameters: &'a [Parameter],
    pub readonly: bool,
}

impl ClassSource<'_> {
    pub fn render(&self) -> String {
        let mut output = String::from("<?php\n\n");

        if !self.namespace.is_empty() {
            output.push_str(&format!("namespace {};\n\n", self.namespace));
        }

        output.push_str(&format!("class {}\n{{\n", self.class_name));

        if self.parameters.is_empty() {
            output.push_str("    public function __construct()\n    {\n    }\n");
        } else {
            output.push_str("    /**\n");
            for parameter in self.parameters {
                output.push_str(&format!("     * @param {} ${}\n", parameter.doc_type(), parameter.name));
            }
            output.push_str("     */\n");

            output.push_str("    public function __construct(\n");
            let modifier = if self.readonly { "public readonly" } else { "public" };
            for parameter in self.parameters {
                output.push_str(&format!(
                    "        {} {} ${},\n",
                    modifier,
                    parameter.declared_type(),
                    parameter.name
                ));
            }
            output.push_str("    ) {\n    }\n");
        }

        output.push_str("}\n");
        output
    }
}
