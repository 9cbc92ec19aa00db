use crate::domain::model::{FrequencyPair, OrderItemRow, OrderRow, TransactionProductRow};
use crate::domain::ports::SalesDatabase;
use crate::utils::error::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const TRANSACTION_PRODUCTS_SQL: &str = r#"
    SELECT
        p.id AS product_id,
        p.name AS product_name,
        c.gender,
        c.age
    FROM products p
    JOIN sale_items si ON p.id = si.product_id
    JOIN sales s ON si.sale_id = s.id
    JOIN customers c ON s.customer_id = c.id
"#;

const FREQUENCY_PAIRS_SQL: &str = r#"
    WITH products_per_sale AS (
        SELECT
            s.id AS sale_id,
            p1.id AS product_a_id,
            p1.name AS product_a_name,
            p2.id AS product_b_id,
            p2.name AS product_b_name
        FROM sales s
        JOIN sale_items i1 ON s.id = i1.sale_id
        JOIN products p1 ON i1.product_id = p1.id
        JOIN sale_items i2 ON s.id = i2.sale_id
        JOIN products p2 ON i2.product_id = p2.id
        WHERE p1.id < p2.id
    )
    SELECT
        product_a_name AS product_a,
        product_b_name AS product_b,
        COUNT(*) AS count
    FROM products_per_sale
    GROUP BY product_a_name, product_b_name
    HAVING COUNT(*) > 3
    ORDER BY count DESC
"#;

const ORDERS_SQL: &str = r#"
    SELECT
        s.id,
        s.sale_date AS order_date,
        s.total AS order_total,
        c.id AS customer_id,
        c.name AS customer_name,
        c.email AS customer_email,
        c.gender AS customer_gender,
        c.age AS customer_age
    FROM sales s
    LEFT JOIN customers c ON s.customer_id = c.id
    ORDER BY s.sale_date DESC
"#;

const ORDER_ITEMS_SQL: &str = r#"
    SELECT
        i.sale_id AS order_id,
        i.product_id,
        p.name AS product_name,
        cat.name AS category,
        i.quantity,
        i.unit_price
    FROM sale_items i
    LEFT JOIN products p ON i.product_id = p.id
    LEFT JOIN categories cat ON p.category_id = cat.id
    WHERE i.sale_id = ANY($1)
"#;

const SCHEMA_STATEMENTS: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100),
        email VARCHAR(100),
        gender VARCHAR(1),
        age INTEGER,
        birth_date DATE,
        signup_date DATE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id SERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        price NUMERIC(10,2),
        category_id INTEGER REFERENCES categories(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sales (
        id SERIAL PRIMARY KEY,
        customer_id INTEGER REFERENCES customers(id),
        sale_date DATE,
        total NUMERIC(10,2)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sale_items (
        id SERIAL PRIMARY KEY,
        sale_id INTEGER REFERENCES sales(id),
        product_id INTEGER REFERENCES products(id),
        quantity INTEGER,
        unit_price NUMERIC(10,2)
    )
    "#,
];

/// PostgreSQL implementation of the sales-store capability. Owns the pool;
/// core code only ever sees the trait.
pub struct PgSalesDatabase {
    pool: PgPool,
}

impl PgSalesDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("Connection to PostgreSQL established");
        Ok(Self { pool })
    }

    /// Creates the source tables when they do not exist yet. Population of
    /// the tables is someone else's job.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Source schema is in place");
        Ok(())
    }
}

#[async_trait]
impl SalesDatabase for PgSalesDatabase {
    async fn transaction_products(&self) -> Result<Vec<TransactionProductRow>> {
        let rows = sqlx::query_as::<_, TransactionProductRow>(TRANSACTION_PRODUCTS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn frequency_pairs(&self) -> Result<Vec<FrequencyPair>> {
        let pairs = sqlx::query_as::<_, FrequencyPair>(FREQUENCY_PAIRS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(pairs)
    }

    async fn orders_with_customers(&self) -> Result<Vec<OrderRow>> {
        let orders = sqlx::query_as::<_, OrderRow>(ORDERS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    async fn items_for_orders(&self, order_ids: &[i32]) -> Result<Vec<OrderItemRow>> {
        let items = sqlx::query_as::<_, OrderItemRow>(ORDER_ITEMS_SQL)
            .bind(order_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
