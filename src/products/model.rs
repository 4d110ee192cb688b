use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Product record. `is_approved == false` is the pending state.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub is_approved: bool,
    pub owner_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub owner_id: Uuid,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
}

impl ProductChanges {
    pub fn apply(&self, p: &mut Product) {
        if let Some(name) = &self.name {
            p.name = name.clone();
        }
        if let Some(description) = &self.description {
            p.description = description.clone();
        }
        if let Some(price) = self.price {
            p.price = price;
        }
        if let Some(quantity) = self.quantity {
            p.quantity = quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let p = Product {
            id: Uuid::new_v4(),
            name: "P".into(),
            description: "D".into(),
            price: 10.0,
            quantity: 1,
            is_approved: false,
            owner_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["isApproved"], false);
        assert_eq!(json["ownerId"], p.owner_id.to_string());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn changes_only_touch_given_fields() {
        let mut p = Product {
            id: Uuid::new_v4(),
            name: "P".into(),
            description: "D".into(),
            price: 10.0,
            quantity: 1,
            is_approved: true,
            owner_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
        };
        ProductChanges {
            price: Some(12.5),
            ..Default::default()
        }
        .apply(&mut p);
        assert_eq!(p.price, 12.5);
        assert_eq!(p.name, "P");
        assert_eq!(p.quantity, 1);
        assert!(p.is_approved);
    }
}
