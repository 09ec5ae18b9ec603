use super::*;
use crate::dialect::{MySql, Postgres, SqlServer, Sqlite};
use std::collections::HashMap;

fn order_details_totals(sel: &mut Select<'_>) {
    sel.from(
        "Order Details",
        vec![
            ColumnSpec::parse("OrderID").unwrap(),
            ColumnSpec::aliased("TotalUnits", r#"SUM("Quantity")"#),
        ],
    )
    .unwrap()
    .group_by("OrderID");
}

#[test]
fn test_empty_select() {
    let d = Sqlite::new();
    assert_eq!(Select::new(&d).build().unwrap(), "SELECT");
}

#[test]
fn test_distinct() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Orders", ["CustomerID"]).unwrap().distinct(true);
    assert_eq!(sel.build().unwrap(), r#"SELECT DISTINCT "CustomerID" FROM "Orders""#);
}

#[test]
fn test_from_all() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Suppliers", "*").unwrap();
    assert_eq!(sel.build().unwrap(), r#"SELECT * FROM "Suppliers""#);
}

#[test]
fn test_from_multiple_all_no_alias() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*").unwrap().from("Suppliers", "*").unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "Products".*, "Suppliers".* FROM "Products", "Suppliers""#
    );
}

#[test]
fn test_from_multiple_all_with_alias() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from(HashMap::from([("p", "Products")]), "*")
        .unwrap()
        .from(TableSpec::aliased("s", "Suppliers"), "*")
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT p.*, s.* FROM "Products" AS p, "Suppliers" AS s"#
    );
}

#[test]
fn test_from_named_columns() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Suppliers", ["SupplierID", "CompanyName", "ContactName"])
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "SupplierID", "CompanyName", "ContactName" FROM "Suppliers""#
    );
}

#[test]
fn test_column_alias_strings() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Suppliers", ["CompanyName AS name", "COUNT(*) as total"])
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "CompanyName" AS name, COUNT(*) AS total FROM "Suppliers""#
    );
}

#[test]
fn test_table_alias_string() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Suppliers as s", ["CompanyName"]).unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "CompanyName" FROM "Suppliers" AS s"#
    );
}

#[test]
fn test_join_inner() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", ["ProductID", "ProductName", "UnitCost"])
        .unwrap()
        .join(
            "inner",
            "Suppliers",
            ["Products.SupplierID", "Suppliers.SupplierID"],
            ["SupplierName"],
        )
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "Products"."ProductID", "Products"."ProductName", "Products"."UnitCost", "Suppliers"."SupplierName" FROM "Products" INNER JOIN "Suppliers" ON "Products"."SupplierID" = "Suppliers"."SupplierID""#
    );
}

#[test]
fn test_join_left_and_right() {
    let d = Sqlite::new();
    for (kind, keyword) in [("left", "LEFT"), ("Right", "RIGHT"), ("left  outer", "LEFT OUTER")] {
        let mut sel = Select::new(&d);
        sel.from("Products", ["ProductID"])
            .unwrap()
            .join(
                kind,
                "Suppliers",
                ("Products.SupplierID", "Suppliers.SupplierID"),
                ["SupplierName"],
            )
            .unwrap();
        assert_eq!(
            sel.build().unwrap(),
            format!(
                r#"SELECT "Products"."ProductID", "Suppliers"."SupplierName" FROM "Products" {keyword} JOIN "Suppliers" ON "Products"."SupplierID" = "Suppliers"."SupplierID""#
            )
        );
    }
}

#[test]
fn test_join_full_raw_condition() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Order Details", "*")
        .unwrap()
        .join(
            "full",
            "Products",
            r#""Order Details"."ProductID" = "Products"."ProductID""#,
            "*",
        )
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "Order Details".*, "Products".* FROM "Order Details" FULL JOIN "Products" ON "Order Details"."ProductID" = "Products"."ProductID""#
    );
}

#[test]
fn test_join_cross() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Orders", "ShipCountry")
        .unwrap()
        .join("cross", "Shippers", (), "CompanyName")
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "Orders"."ShipCountry", "Shippers"."CompanyName" FROM "Orders" CROSS JOIN "Shippers""#
    );
}

#[test]
fn test_join_natural() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Order Details", "*")
        .unwrap()
        .join("natural", "Products", JoinOn::None, "*")
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "Order Details".*, "Products".* FROM "Order Details" NATURAL JOIN "Products""#
    );
}

#[test]
fn test_join_using() {
    let d = Postgres::new();
    let mut sel = Select::new(&d);
    sel.from("orders", "*")
        .unwrap()
        .join("inner", "customers", ["USING", "customer_id", "region"], ())
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "orders" INNER JOIN "customers" USING ("customer_id", "region")"#
    );
}

#[test]
fn test_join_two_inners() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Employees AS e", ["FirstName", "LastName", "Title"])
        .unwrap();
    sel.join(
        "inner",
        "EmployeeTerritories AS et",
        ["Employees.EmployeeID", "EmployeeTerritories.EmployeeID"],
        (),
    )
    .unwrap();
    sel.join(
        "inner",
        "Territories AS t",
        ["EmployeeTerritories.TerritoryID", "Territories.TerritoryID"],
        ["TerritoryDescription"],
    )
    .unwrap();
    let expected = concat!(
        r#"SELECT e."FirstName", e."LastName", e."Title", t."TerritoryDescription" "#,
        r#"FROM "Employees" AS e "#,
        r#"INNER JOIN "EmployeeTerritories" AS et ON "Employees"."EmployeeID" = "EmployeeTerritories"."EmployeeID""#,
        "\n",
        r#"INNER JOIN "Territories" AS t ON "EmployeeTerritories"."TerritoryID" = "Territories"."TerritoryID""#,
    );
    assert_eq!(sel.build().unwrap(), expected);
}

#[test]
fn test_repeated_correlation_appends_columns_only() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", ["ProductID"])
        .unwrap()
        .from("Products", ["ProductName"])
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "ProductID", "ProductName" FROM "Products""#
    );
}

#[test]
fn test_invalid_join_type_leaves_builder_unchanged() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*").unwrap();
    let before = sel.build().unwrap();

    let err = sel.join("OUTER", "Suppliers", (), "*").unwrap_err();
    assert!(err.is_invalid_spec());
    assert_eq!(sel.build().unwrap(), before);
}

#[test]
fn test_malformed_join_condition() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*").unwrap();
    let before = sel.build().unwrap();

    let err = sel
        .join("inner", "Suppliers", ["a", "b", "c"], "*")
        .unwrap_err();
    assert!(err.is_invalid_spec());
    let err = sel
        .join("inner", "Suppliers", vec!["USING"], "*")
        .unwrap_err();
    assert!(err.is_invalid_spec());
    assert_eq!(sel.build().unwrap(), before);
}

#[test]
fn test_invalid_table_and_column_shapes() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    assert!(sel.from("", "*").unwrap_err().is_invalid_spec());
    assert!(
        sel.from(HashMap::from([("a", "A"), ("b", "B")]), "*")
            .unwrap_err()
            .is_invalid_spec()
    );
    assert!(
        sel.from(HashMap::<String, String>::new(), "*")
            .unwrap_err()
            .is_invalid_spec()
    );
    assert!(sel.from("Products", ["ProductID", " "]).unwrap_err().is_invalid_spec());
    assert!(ColumnSpec::from_map([("x", "a"), ("y", "b")]).is_err());
    assert_eq!(sel.build().unwrap(), "SELECT");
}

#[test]
fn test_empty_alias_is_rejected() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    assert!(
        sel.from(HashMap::from([("", "Orders")]), "*")
            .unwrap_err()
            .is_invalid_spec()
    );
    assert!(
        sel.from(HashMap::from([("  ", "Orders")]), "*")
            .unwrap_err()
            .is_invalid_spec()
    );
    assert!(ColumnSpec::from_map([("", "ProductName")]).unwrap_err().is_invalid_spec());
    assert_eq!(TableSpec::from_map([(" o ", "Orders")]).unwrap().alias.as_deref(), Some("o"));
    assert_eq!(sel.build().unwrap(), "SELECT");
}

#[test]
fn test_where_equals() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("ProductID", "=", 17)
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "ProductID" = 17"#
    );
}

#[test]
fn test_where_not_equals() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("ProductID", "!=", 25)
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "ProductID" != 25"#
    );
}

#[test]
fn test_where_less_than_equal_to() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("UnitPrice", "<=", 9.99)
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "UnitPrice" <= 9.99"#
    );
}

#[test]
fn test_where_and_chain() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("UnitPrice", ">", 9.99)
        .unwrap()
        .where_with("UnitPrice", "<", 30.01, "AND")
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "UnitPrice" > 9.99 AND "UnitPrice" < 30.01"#
    );
}

#[test]
fn test_where_or_chain() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("UnitsInStock", "=", 0)
        .unwrap()
        .where_with("UnitsInStock", ">=", 100, " or ")
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "UnitsInStock" = 0 OR "UnitsInStock" >= 100"#
    );
}

#[test]
fn test_first_where_has_no_connective() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .or_where("Discontinued", "=", 1)
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "Discontinued" = 1"#
    );
}

#[test]
fn test_connective_checked_only_when_joining() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .where_with("Discontinued", "=", 1, "XOR")
        .unwrap()
        .having_with("COUNT(*) > 1", "XOR")
        .unwrap();
    let before = sel.build().unwrap();
    assert_eq!(
        before,
        r#"SELECT * FROM "Products" WHERE "Discontinued" = 1 HAVING COUNT(*) > 1"#
    );

    assert!(
        sel.where_with("ProductID", "=", 2, "XOR")
            .unwrap_err()
            .is_invalid_spec()
    );
    assert!(sel.having_with("SUM(x) > 0", "XOR").unwrap_err().is_invalid_spec());
    assert_eq!(sel.build().unwrap(), before);
}

#[test]
fn test_where_like() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("ProductName", "LIKE", "Sir")
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "ProductName" LIKE '%Sir%'"#
    );
}

#[test]
fn test_where_not_like() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("QuantityPerUnit", "not like", "pkgs")
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "QuantityPerUnit" NOT LIKE '%pkgs%'"#
    );
}

#[test]
fn test_where_between_and_in() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("UnitPrice", "BETWEEN", [10, 20])
        .unwrap()
        .and_where("CategoryID", "in", vec![1, 2, 3])
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Products" WHERE "UnitPrice" BETWEEN 10 AND 20 AND "CategoryID" IN(1, 2, 3)"#
    );
}

#[test]
fn test_invalid_where_leaves_builder_unchanged() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("ProductID", "=", 1)
        .unwrap();
    let before = sel.build().unwrap();

    assert!(sel.and_where("ProductID", "~~~", 1).unwrap_err().is_invalid_spec());
    assert!(
        sel.where_with("ProductID", "=", 2, "XOR")
            .unwrap_err()
            .is_invalid_spec()
    );
    assert_eq!(sel.build().unwrap(), before);
}

#[test]
fn test_group_by() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    order_details_totals(&mut sel);
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "OrderID", SUM("Quantity") AS TotalUnits FROM "Order Details" GROUP BY "OrderID""#
    );
}

#[test]
fn test_having() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    order_details_totals(&mut sel);
    sel.having(("TotalUnits", ">", 20)).unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "OrderID", SUM("Quantity") AS TotalUnits FROM "Order Details" GROUP BY "OrderID" HAVING "TotalUnits" > 20"#
    );
}

#[test]
fn test_having_chain() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    order_details_totals(&mut sel);
    sel.or_having(("TotalUnits", ">", 20))
        .unwrap()
        .or_having(r#"SUM("Quantity") < 5"#)
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT "OrderID", SUM("Quantity") AS TotalUnits FROM "Order Details" GROUP BY "OrderID" HAVING "TotalUnits" > 20 OR SUM("Quantity") < 5"#
    );
    assert!(sel.having_with("x > 1", "NAND").unwrap_err().is_invalid_spec());
}

#[test]
fn test_order_by() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Employees", "*")
        .unwrap()
        .order_by_dir("FirstName", "ASC")
        .unwrap()
        .order_by_dir("LastName", "desc")
        .unwrap()
        .order_by("EmployeeID");
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Employees" ORDER BY "FirstName" ASC, "LastName" DESC, "EmployeeID""#
    );
    assert!(sel.order_by_dir("Title", "UP").unwrap_err().is_invalid_spec());
}

#[test]
fn test_limit() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Orders", "*").unwrap().limit(25, 0);
    assert_eq!(sel.build().unwrap(), r#"SELECT * FROM "Orders" LIMIT 25"#);

    sel.limit(25, 75);
    assert_eq!(
        sel.build().unwrap(),
        r#"SELECT * FROM "Orders" LIMIT 25 OFFSET 75"#
    );
}

#[test]
fn test_limit_page() {
    let d = Sqlite::new();
    let mut paged = Select::new(&d);
    paged.from("Orders", "*").unwrap().limit_page(3, 25);
    let mut explicit = Select::new(&d);
    explicit.from("Orders", "*").unwrap().limit(25, 50);

    assert_eq!(
        paged.build().unwrap(),
        r#"SELECT * FROM "Orders" LIMIT 25 OFFSET 50"#
    );
    assert_eq!(paged.build().unwrap(), explicit.build().unwrap());
}

#[test]
fn test_limit_values_truncate() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Orders", "*").unwrap().limit_values(10.9, "abc");
    assert_eq!(sel.build().unwrap(), r#"SELECT * FROM "Orders" LIMIT 10"#);
}

#[test]
fn test_limit_unsupported_on_sql_server() {
    let d = SqlServer::new();
    let mut sel = Select::new(&d);
    sel.from("Orders", "*").unwrap();
    assert_eq!(sel.build().unwrap(), "SELECT * FROM [Orders]");

    sel.limit(10, 0);
    assert!(sel.build().unwrap_err().is_unsupported());
    assert!(String::try_from(&sel).unwrap_err().is_unsupported());
}

#[test]
fn test_mysql_quoting() {
    let d = MySql::new();
    let mut sel = Select::new(&d);
    sel.from("Order Details", ["OrderID"])
        .unwrap()
        .and_where("Note", "=", "it's")
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        r"SELECT `OrderID` FROM `Order Details` WHERE `Note` = 'it\'s'"
    );
}

#[test]
fn test_auto_quote_disabled() {
    let d = Postgres::new().with_auto_quote(false);
    let mut sel = Select::new(&d);
    sel.from("orders", ["id", "total"])
        .unwrap()
        .and_where("total", ">", 100)
        .unwrap();
    assert_eq!(
        sel.build().unwrap(),
        "SELECT id, total FROM orders WHERE total > 100"
    );
}

#[test]
fn test_reset_matches_fresh_builder() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    order_details_totals(&mut sel);
    sel.having(("TotalUnits", ">", 20))
        .unwrap()
        .distinct(true)
        .order_by("OrderID")
        .limit(5, 5);
    sel.reset();
    assert_eq!(sel.build().unwrap(), Select::new(&d).build().unwrap());

    sel.from("Orders", "*").unwrap();
    assert_eq!(sel.build().unwrap(), r#"SELECT * FROM "Orders""#);
}

#[test]
fn test_build_is_deterministic() {
    let d = Sqlite::new();
    let mut sel = Select::new(&d);
    sel.from("Products", "*")
        .unwrap()
        .and_where("ProductID", "=", 1)
        .unwrap();
    let first = sel.build().unwrap();
    assert_eq!(sel.build().unwrap(), first);
    assert_eq!(String::try_from(&sel).unwrap(), first);

    sel.order_by("ProductID");
    assert_ne!(sel.build().unwrap(), first);
}
