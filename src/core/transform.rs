use crate::domain::model::{
    DwCustomer, DwOrder, DwOrderItem, FrequencyPair, OrderWithItems, OrdersReport, PairEntry,
    PairsReport, ProfileEntry, ProfileReport, TransactionProductRow,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

const DATE_STAMP_FORMAT: &str = "%d/%m/%Y";

/// Maps an age to one of the seven fixed report buckets.
pub fn age_range(age: i32) -> &'static str {
    if age < 18 {
        "0-17"
    } else if age <= 24 {
        "18-24"
    } else if age <= 34 {
        "25-34"
    } else if age <= 44 {
        "35-44"
    } else if age <= 54 {
        "45-54"
    } else if age <= 64 {
        "55-64"
    } else {
        "65+"
    }
}

/// Majority gender and most common age bucket per product.
///
/// Gender ties go to "M"; age-bucket ties go to the first bucket that
/// reached the max count, in input iteration order. Both biases are kept
/// deliberately. Gender values other than "M"/"F" are left out of the
/// gender tally but still count toward the age buckets.
pub fn product_predominant_profile(
    rows: &[TransactionProductRow],
    processing_date: NaiveDate,
) -> ProfileReport {
    let mut product_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<(&str, i32)>> = HashMap::new();

    for row in rows {
        let group = groups.entry(row.product_name.as_str()).or_insert_with(|| {
            product_order.push(row.product_name.as_str());
            Vec::new()
        });
        group.push((row.gender.as_str(), row.age));
    }

    let mut data = Vec::with_capacity(product_order.len());
    for product_name in product_order {
        let profiles = &groups[product_name];

        let mut male_count = 0usize;
        let mut female_count = 0usize;
        // Insertion-ordered tally so a tie resolves to the bucket seen first.
        let mut age_buckets: Vec<(&'static str, usize)> = Vec::new();

        for (gender, age) in profiles {
            match *gender {
                "M" => male_count += 1,
                "F" => female_count += 1,
                _ => {}
            }
            let bucket = age_range(*age);
            match age_buckets.iter_mut().find(|(label, _)| *label == bucket) {
                Some((_, count)) => *count += 1,
                None => age_buckets.push((bucket, 1)),
            }
        }

        let predominant_gender = if male_count >= female_count { "M" } else { "F" };

        let mut predominant_age_range = "";
        let mut best = 0usize;
        for (label, count) in &age_buckets {
            if *count > best {
                best = *count;
                predominant_age_range = label;
            }
        }

        data.push(ProfileEntry {
            product: product_name.to_string(),
            predominant_gender: predominant_gender.to_string(),
            predominant_age_range: predominant_age_range.to_string(),
        });
    }

    ProfileReport {
        processing_date: processing_date.format(DATE_STAMP_FORMAT).to_string(),
        data,
    }
}

/// Field renaming of the co-purchase pairs; input order is preserved (the
/// extractor already sorted by descending count).
pub fn most_common_products(pairs: &[FrequencyPair], processing_date: NaiveDate) -> PairsReport {
    let data = pairs
        .iter()
        .map(|pair| PairEntry {
            product_1: pair.product_a.clone(),
            product_2: pair.product_b.clone(),
            count: pair.count,
        })
        .collect();

    PairsReport {
        processing_date: processing_date.format(DATE_STAMP_FORMAT).to_string(),
        data,
    }
}

/// Denormalizes complete orders for the warehouse: distinct categories,
/// nested customer with derived age group, items with computed totals.
/// Missing scalar fields default to ""/0 instead of failing the transform.
pub fn complete_orders_to_dw(
    orders: &[OrderWithItems],
    processing_date: NaiveDate,
    generated_at: DateTime<Utc>,
) -> OrdersReport {
    let data = orders
        .iter()
        .map(|entry| {
            let mut categories: Vec<String> = Vec::new();
            for item in &entry.items {
                if let Some(category) = &item.category {
                    if !categories.iter().any(|seen| seen == category) {
                        categories.push(category.clone());
                    }
                }
            }

            let age = entry.order.customer_age.unwrap_or(0);
            let customer = DwCustomer {
                id: entry.order.customer_id.unwrap_or(0),
                name: entry.order.customer_name.clone().unwrap_or_default(),
                email: entry.order.customer_email.clone().unwrap_or_default(),
                gender: entry.order.customer_gender.clone().unwrap_or_default(),
                age,
                age_group: age_range(age).to_string(),
            };

            let items = entry
                .items
                .iter()
                .map(|item| {
                    let quantity = item.quantity.unwrap_or(0);
                    let total_price = item
                        .unit_price
                        .as_ref()
                        .map(|unit| unit * BigDecimal::from(quantity));
                    DwOrderItem {
                        product_id: item.product_id.unwrap_or(0),
                        product_name: item.product_name.clone().unwrap_or_default(),
                        category: item.category.clone().unwrap_or_default(),
                        quantity,
                        unit_price: item.unit_price.clone(),
                        total_price,
                    }
                })
                .collect();

            DwOrder {
                order_id: entry.order.id,
                order_date: entry
                    .order
                    .order_date
                    .map(|date| date.to_string())
                    .unwrap_or_default(),
                order_total: entry.order.order_total.clone(),
                categories,
                customer,
                items,
            }
        })
        .collect();

    OrdersReport {
        processing_date: processing_date.format(DATE_STAMP_FORMAT).to_string(),
        generated_at: generated_at.to_rfc3339(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{OrderItemRow, OrderRow};
    use std::str::FromStr;

    fn row(product_id: i32, product_name: &str, gender: &str, age: i32) -> TransactionProductRow {
        TransactionProductRow {
            product_id,
            product_name: product_name.to_string(),
            gender: gender.to_string(),
            age,
        }
    }

    fn stamp() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_age_range_boundaries() {
        assert_eq!(age_range(0), "0-17");
        assert_eq!(age_range(17), "0-17");
        assert_eq!(age_range(18), "18-24");
        assert_eq!(age_range(24), "18-24");
        assert_eq!(age_range(25), "25-34");
        assert_eq!(age_range(34), "25-34");
        assert_eq!(age_range(35), "35-44");
        assert_eq!(age_range(45), "45-54");
        assert_eq!(age_range(55), "55-64");
        assert_eq!(age_range(64), "55-64");
        assert_eq!(age_range(65), "65+");
        assert_eq!(age_range(99), "65+");
    }

    #[test]
    fn test_profile_majority_gender_and_age_tie_break() {
        // Three buckets each hit count 1: 25-34 (age 30), 35-44 (age 40),
        // 18-24 (age 22). The first bucket to reach the max wins, following
        // input iteration order.
        let rows = vec![
            row(1, "Widget", "M", 30),
            row(1, "Widget", "F", 40),
            row(1, "Widget", "M", 22),
        ];

        let report = product_predominant_profile(&rows, stamp());

        assert_eq!(report.processing_date, "14/03/2025");
        assert_eq!(report.data.len(), 1);
        let entry = &report.data[0];
        assert_eq!(entry.product, "Widget");
        assert_eq!(entry.predominant_gender, "M");
        assert_eq!(entry.predominant_age_range, "25-34");
    }

    #[test]
    fn test_profile_gender_tie_goes_to_m() {
        let rows = vec![row(1, "Widget", "F", 30), row(1, "Widget", "M", 31)];
        let report = product_predominant_profile(&rows, stamp());
        assert_eq!(report.data[0].predominant_gender, "M");
    }

    #[test]
    fn test_profile_female_majority() {
        let rows = vec![
            row(1, "Widget", "F", 30),
            row(1, "Widget", "F", 41),
            row(1, "Widget", "M", 52),
        ];
        let report = product_predominant_profile(&rows, stamp());
        assert_eq!(report.data[0].predominant_gender, "F");
    }

    #[test]
    fn test_profile_groups_follow_first_encounter_order() {
        let rows = vec![
            row(2, "Gadget", "M", 20),
            row(1, "Widget", "F", 30),
            row(2, "Gadget", "F", 21),
        ];
        let report = product_predominant_profile(&rows, stamp());
        assert_eq!(report.data.len(), 2);
        assert_eq!(report.data[0].product, "Gadget");
        assert_eq!(report.data[1].product, "Widget");
    }

    #[test]
    fn test_profile_ignores_unknown_gender_values() {
        let rows = vec![
            row(1, "Widget", "X", 30),
            row(1, "Widget", "F", 31),
        ];
        let report = product_predominant_profile(&rows, stamp());
        // One F vs zero M: female majority, while the X row still
        // contributed its age bucket.
        assert_eq!(report.data[0].predominant_gender, "F");
        assert_eq!(report.data[0].predominant_age_range, "25-34");
    }

    #[test]
    fn test_profile_empty_input() {
        let report = product_predominant_profile(&[], stamp());
        assert!(report.data.is_empty());
        assert_eq!(report.processing_date, "14/03/2025");
    }

    #[test]
    fn test_most_common_products_is_pure_renaming() {
        let pairs = vec![
            FrequencyPair {
                product_a: "A".to_string(),
                product_b: "B".to_string(),
                count: 5,
            },
            FrequencyPair {
                product_a: "C".to_string(),
                product_b: "D".to_string(),
                count: 4,
            },
        ];

        let report = most_common_products(&pairs, stamp());

        assert_eq!(report.data.len(), 2);
        assert_eq!(report.data[0].product_1, "A");
        assert_eq!(report.data[0].product_2, "B");
        assert_eq!(report.data[0].count, 5);
        assert_eq!(report.data[1].product_1, "C");
    }

    fn order_with_items(items: Vec<OrderItemRow>) -> OrderWithItems {
        OrderWithItems {
            order: OrderRow {
                id: 7,
                order_date: NaiveDate::from_ymd_opt(2025, 1, 2),
                order_total: Some(BigDecimal::from_str("99.90").unwrap()),
                customer_id: Some(3),
                customer_name: Some("Ana Lima".to_string()),
                customer_email: Some("ana@example.com".to_string()),
                customer_gender: Some("F".to_string()),
                customer_age: Some(41),
            },
            items,
        }
    }

    fn item(category: Option<&str>, quantity: i32, unit_price: &str) -> OrderItemRow {
        OrderItemRow {
            order_id: 7,
            product_id: Some(11),
            product_name: Some("Notebook".to_string()),
            category: category.map(str::to_string),
            quantity: Some(quantity),
            unit_price: Some(BigDecimal::from_str(unit_price).unwrap()),
        }
    }

    #[test]
    fn test_orders_categories_distinct_and_non_null() {
        let order = order_with_items(vec![
            item(Some("X"), 1, "10.00"),
            item(Some("Y"), 1, "10.00"),
            item(Some("X"), 1, "10.00"),
            item(None, 1, "10.00"),
        ]);

        let generated_at = DateTime::parse_from_rfc3339("2025-03-14T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let report = complete_orders_to_dw(&[order], stamp(), generated_at);

        assert_eq!(report.data[0].categories, vec!["X", "Y"]);
        assert_eq!(report.generated_at, "2025-03-14T12:00:00+00:00");
    }

    #[test]
    fn test_orders_item_total_price_is_exact() {
        let order = order_with_items(vec![item(Some("X"), 3, "12.50")]);
        let generated_at = Utc::now();
        let report = complete_orders_to_dw(&[order], stamp(), generated_at);

        let dw_item = &report.data[0].items[0];
        assert_eq!(
            dw_item.total_price,
            Some(BigDecimal::from_str("37.50").unwrap())
        );
        assert_eq!(dw_item.quantity, 3);
    }

    #[test]
    fn test_orders_customer_age_group_is_derived() {
        let order = order_with_items(vec![]);
        let report = complete_orders_to_dw(&[order], stamp(), Utc::now());

        let customer = &report.data[0].customer;
        assert_eq!(customer.age, 41);
        assert_eq!(customer.age_group, "35-44");
        assert_eq!(customer.name, "Ana Lima");
    }

    #[test]
    fn test_orders_missing_fields_default() {
        let entry = OrderWithItems {
            order: OrderRow {
                id: 8,
                order_date: None,
                order_total: None,
                customer_id: None,
                customer_name: None,
                customer_email: None,
                customer_gender: None,
                customer_age: None,
            },
            items: vec![OrderItemRow {
                order_id: 8,
                product_id: None,
                product_name: None,
                category: None,
                quantity: None,
                unit_price: None,
            }],
        };

        let report = complete_orders_to_dw(&[entry], stamp(), Utc::now());
        let order = &report.data[0];

        assert_eq!(order.order_date, "");
        assert_eq!(order.customer.id, 0);
        assert_eq!(order.customer.name, "");
        assert_eq!(order.customer.age, 0);
        assert_eq!(order.customer.age_group, "0-17");
        assert!(order.categories.is_empty());
        assert_eq!(order.items[0].product_name, "");
        assert_eq!(order.items[0].quantity, 0);
        assert_eq!(order.items[0].unit_price, None);
        assert_eq!(order.items[0].total_price, None);
    }

    #[test]
    fn test_orders_without_items_still_emitted() {
        let order = order_with_items(vec![]);
        let report = complete_orders_to_dw(&[order], stamp(), Utc::now());
        assert_eq!(report.data.len(), 1);
        assert!(report.data[0].items.is_empty());
    }
}
