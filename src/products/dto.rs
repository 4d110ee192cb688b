use serde::Deserialize;
use uuid::Uuid;

use super::model::{NewProduct, ProductChanges};
use crate::validation::{Errors, FieldError, Validate};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: i32,
}

impl CreateProductRequest {
    pub fn into_new(self, owner_id: Uuid) -> NewProduct {
        NewProduct {
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            owner_id,
        }
    }
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errs = Errors::new();
        errs.not_blank("name", &self.name);
        errs.non_negative("price", self.price);
        errs.check(self.quantity >= 0, "quantity", "must be a non-negative integer");
        errs.finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(r: UpdateProductRequest) -> Self {
        Self {
            name: r.name.map(|n| n.trim().to_string()),
            description: r.description,
            price: r.price,
            quantity: r.quantity,
        }
    }
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errs = Errors::new();
        if let Some(name) = &self.name {
            errs.not_blank("name", name);
        }
        if let Some(price) = self.price {
            errs.non_negative("price", price);
        }
        if let Some(quantity) = self.quantity {
            errs.check(quantity >= 0, "quantity", "must be a non-negative integer");
        }
        errs.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_negative_price_and_quantity() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "P", "description": "D", "price": -1, "quantity": -2
        }))
        .unwrap();
        let fields: Vec<_> = req.validate().unwrap_err().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["price", "quantity"]);
    }

    #[test]
    fn create_accepts_integer_price_and_defaults_quantity() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "P", "description": "D", "price": 10
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.quantity, 0);
        assert_eq!(req.price, 10.0);
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert!(UpdateProductRequest::default().validate().is_ok());
        let bad = UpdateProductRequest {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(bad.validate().unwrap_err()[0].field, "name");
    }
}
