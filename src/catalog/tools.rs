//! Product-enquiry tools backed by a [`Catalog`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::{ApplianceFilter, Catalog};
use crate::error::LogiqError;
use crate::tools::{FunctionTool, Tool, ToolArguments, ToolContext, ToolParameters};

pub const GET_CATEGORIES: &str = "get_categories";
pub const GET_SUB_CATEGORIES: &str = "get_sub_categories";
pub const GET_FILTERED_APPLIANCES: &str = "get_filtered_appliances";
pub const GET_APPLIANCE_SPECIFICATIONS: &str = "get_appliance_specifications";

/// `get_categories`: the catalog's category list.
///
/// Also run directly, outside the model loop, to preload categories into
/// session state.
pub struct CategoriesTool {
    catalog: Arc<Catalog>,
    parameters: ToolParameters,
}

impl CategoriesTool {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            parameters: ToolParameters::empty(),
        }
    }

    /// Distinct categories, sorted.
    pub fn list(&self) -> Vec<String> {
        self.catalog.categories()
    }
}

#[async_trait]
impl Tool for CategoriesTool {
    fn name(&self) -> &str {
        GET_CATEGORIES
    }

    fn description(&self) -> &str {
        "List every appliance category offered by LogIQ."
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        _args: &ToolArguments,
        _ctx: &ToolContext,
    ) -> Result<serde_json::Value, LogiqError> {
        Ok(json!({ "categories": self.list() }))
    }
}

pub fn get_sub_categories_tool(catalog: Arc<Catalog>) -> Arc<dyn Tool> {
    Arc::new(FunctionTool::new(
        GET_SUB_CATEGORIES,
        "List the sub-categories available within one appliance category.",
        ToolParameters::object()
            .string("category", "Appliance category, e.g. Refrigerator", true)
            .build(),
        move |args: ToolArguments, _ctx| {
            let catalog = Arc::clone(&catalog);
            async move {
                let category = args.get_str("category")?;
                Ok::<_, LogiqError>(json!({
                    "category": category,
                    "sub_categories": catalog.sub_categories(category),
                }))
            }
        },
    ))
}

pub fn get_filtered_appliances_tool(catalog: Arc<Catalog>) -> Arc<dyn Tool> {
    Arc::new(FunctionTool::new(
        GET_FILTERED_APPLIANCES,
        "Find appliances by category, sub-category, brand, color and price range. \
         Returns id, name, brand and price for each match, cheapest first.",
        ToolParameters::object()
            .string("category", "Appliance category", false)
            .string("sub_category", "Sub-category within the category", false)
            .string("brand", "Brand name", false)
            .string("color", "Required color", false)
            .number("min_price", "Lowest acceptable price", false)
            .number("max_price", "Highest acceptable price", false)
            .build(),
        move |args: ToolArguments, _ctx| {
            let catalog = Arc::clone(&catalog);
            async move {
                let filter = ApplianceFilter {
                    category: args.get_opt_str("category").map(str::to_string),
                    sub_category: args.get_opt_str("sub_category").map(str::to_string),
                    brand: args.get_opt_str("brand").map(str::to_string),
                    color: args.get_opt_str("color").map(str::to_string),
                    min_price: args.get_opt_f64("min_price"),
                    max_price: args.get_opt_f64("max_price"),
                };
                let appliances: Vec<_> = catalog
                    .filter(&filter)
                    .into_iter()
                    .map(|a| {
                        json!({
                            "id": a.id,
                            "name": a.name,
                            "brand": a.brand,
                            "category": a.category,
                            "sub_category": a.sub_category,
                            "price": a.price,
                        })
                    })
                    .collect();
                Ok::<_, LogiqError>(json!({
                    "count": appliances.len(),
                    "appliances": appliances,
                }))
            }
        },
    ))
}

pub fn get_appliance_specifications_tool(catalog: Arc<Catalog>) -> Arc<dyn Tool> {
    Arc::new(FunctionTool::new(
        GET_APPLIANCE_SPECIFICATIONS,
        "Full specifications of one appliance: dimensions, colors, price and technical details.",
        ToolParameters::object()
            .string("appliance_id", "Appliance id as returned by get_filtered_appliances", true)
            .build(),
        move |args: ToolArguments, _ctx| {
            let catalog = Arc::clone(&catalog);
            async move {
                let id = args.get_str("appliance_id")?;
                let appliance = catalog
                    .specifications(id)
                    .ok_or_else(|| {
                        LogiqError::tool(
                            GET_APPLIANCE_SPECIFICATIONS,
                            format!("no appliance with id '{id}'"),
                        )
                    })?;
                Ok::<_, LogiqError>(serde_json::to_value(appliance)?)
            }
        },
    ))
}

/// Tools the product-enquiry agent exposes to the model.
///
/// Categories are not included: they are preloaded into session state.
pub fn enquiry_tools(catalog: &Arc<Catalog>) -> Vec<Arc<dyn Tool>> {
    vec![
        get_appliance_specifications_tool(Arc::clone(catalog)),
        get_sub_categories_tool(Arc::clone(catalog)),
        get_filtered_appliances_tool(Arc::clone(catalog)),
    ]
}
