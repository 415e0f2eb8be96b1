use dw_sales_assistant::error::{ReportError, SchemaError};
use dw_sales_assistant::extract::{ExtractCache, ExtractKind, ExtractLoader};
use dw_sales_assistant::intent_resolver;
use dw_sales_assistant::records::CustomerType;
use dw_sales_assistant::render::{self, OutputFormat};
use dw_sales_assistant::report::{MetricValue, ReportTable};
use dw_sales_assistant::{Intent, Session, ViewerConfig};
use rust_decimal_macros::dec;
use std::fs;
use std::path::Path;

fn write(dir: &Path, file: &str, contents: &str) {
    fs::write(dir.join(file), contents).unwrap();
}

/// A data directory with every export the reports read. The sales export
/// uses `;` with pt-BR decimals, the rest use `,`.
fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    write(
        path,
        "vw_vendas_nf.csv",
        "numero_nf;data_venda;valor_venda;forma_pagamento;nome_vendedor;id_cliente\n\
         1001;2024-03-01;100,00;pix;Rui;c1\n\
         1002;2024-03-02;30,00;cartao;Lia;c2\n\
         1003;2024-03-02;50,00;pix;Rui;c2\n",
    );

    let mut monthly = String::from("ano,mes,mes_extenso,faturamento,ticket_medio\n");
    let revenues = [500, 120, 900, 300, 750, 80, 640, 410, 220, 999, 35, 860];
    for (i, revenue) in revenues.iter().enumerate() {
        monthly.push_str(&format!("2024,{},m{},{},10\n", i + 1, i + 1, revenue));
    }
    write(path, "vw_vendas_mensais.csv", &monthly);

    write(
        path,
        "vw_cliente_resumo.csv",
        "id_cliente,nome_cliente,total_comprado,qtd_compras,ultima_compra\n\
         1,Ana,500,5,2024-01-10\n\
         2,Bia,900,2,2024-02-11\n\
         3,Caio,700,9,2023-12-01\n\
         4,Davi,1000,1,2024-03-05\n",
    );

    write(
        path,
        "vw_clientes_ativos_inativos.csv",
        "id_cliente,nome_cliente,data_ultima_compra,status_cliente\n\
         1,Ana,2024-01-10,inativo\n\
         2,Bia,2024-02-11,ativo\n\
         3,Caio,2023-12-01, INATIVO \n",
    );

    write(
        path,
        "vw_frequencia_cliente.csv",
        "id_cliente,nome_cliente,qtd_compras,faturamento_total,dias_medios_entre_compras\n\
         1,Ana,5,500,12.5\n\
         2,Bia,1,900,\n\
         3,Caio,9,700,40\n",
    );

    write(
        path,
        "vw_vendas_diarias.csv",
        "data,faturamento,qtd_vendas,ticket_medio\n\
         05/03/2024,300,3,100\n\
         2024-03-01,50,1,50\n\
         2024-03-03,80,2,40\n\
         02/03/2024,120,4,30\n",
    );

    write(
        path,
        "vw_mix_cliente_tipo_por_vendedor.csv",
        "nome_vendedor,tipo_pessoa,qtd_vendas,faturamento,participacao_pct\n\
         Rui,PF,2,150,83.33\n\
         Rui,pj,1,30,16.67\n\
         Lia,PJ,1,30,100\n",
    );

    dir
}

fn session(dir: &Path) -> Session {
    Session::new(ExtractLoader::new(dir))
}

#[test]
fn test_payment_method_revenue_from_semicolon_export() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    let output = session.run(Intent::PaymentMethodRevenue).unwrap();
    match &output.table {
        ReportTable::Groups { dimension, rows } => {
            assert_eq!(dimension, "forma_pagamento");
            assert_eq!(rows.len(), 2);
            assert_eq!((rows[0].key.as_str(), rows[0].revenue, rows[0].sale_count), ("pix", dec!(150), 2));
            assert_eq!((rows[1].key.as_str(), rows[1].revenue, rows[1].sale_count), ("cartao", dec!(30), 1));
        }
        other => panic!("unexpected table: {other:?}"),
    }
    assert_eq!(output.sources, vec!["vw_vendas_nf.csv".to_string()]);
}

#[test]
fn test_general_kpis_totals() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    let output = session.run(Intent::GeneralKpis).unwrap();
    assert!(output.metrics.iter().any(|m| m.value == MetricValue::Money(dec!(180))));
    assert!(output.metrics.iter().any(|m| m.value == MetricValue::Count(3)));
    assert!(output.metrics.iter().any(|m| m.value == MetricValue::Money(dec!(60))));
}

#[test]
fn test_best_months_lists_all_twelve() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    let output = session.run(Intent::BestMonths).unwrap();
    match &output.table {
        ReportTable::Months(rows) => {
            assert_eq!(rows.len(), 12);
            assert_eq!(rows[0].period, "2024-10");
            assert!(rows.windows(2).all(|w| w[0].revenue >= w[1].revenue));
        }
        other => panic!("unexpected table: {other:?}"),
    }
}

#[test]
fn test_high_value_inactive_joins_status() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    let output = session.run(Intent::HighValueInactive).unwrap();
    match &output.table {
        ReportTable::Reactivation(rows) => {
            let names: Vec<&str> = rows.iter().filter_map(|r| r.customer_name.as_deref()).collect();
            assert_eq!(names, ["Caio", "Ana"]);
        }
        other => panic!("unexpected table: {other:?}"),
    }
    assert_eq!(
        output.sources,
        vec![
            "vw_cliente_resumo.csv".to_string(),
            "vw_clientes_ativos_inativos.csv".to_string()
        ]
    );
}

#[test]
fn test_churn_skips_customers_without_average() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    let output = session.run(Intent::ChurnRisk).unwrap();
    match &output.table {
        ReportTable::Frequency(rows) => {
            let ids: Vec<&str> = rows.iter().filter_map(|r| r.customer_id.as_deref()).collect();
            assert_eq!(ids, ["3", "1"]);
        }
        other => panic!("unexpected table: {other:?}"),
    }
}

#[test]
fn test_missing_fields_are_named() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "vw_vendas_nf.csv", "valor,id_cliente\n10,c1\n");
    let mut session = session(dir.path());

    match session.run(Intent::DistinctCustomersPerSeller).unwrap_err() {
        ReportError::SchemaValidation(SchemaError::MissingFields { extract, fields }) => {
            assert_eq!(extract, "vw_vendas_nf.csv");
            assert_eq!(fields, vec!["nome_vendedor".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(dir.path());

    let err = session.run(Intent::DailySeries).unwrap_err();
    assert!(matches!(err, ReportError::FileNotFound { .. }));
    assert!(err.to_string().contains("vw_vendas_diarias.csv"));
}

#[test]
fn test_session_reuses_loaded_extracts() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    session.run(Intent::TopSellersByRevenue).unwrap();
    assert_eq!(session.cache().len(), 1);

    // Served from the cache once loaded.
    fs::remove_file(dir.path().join("vw_vendas_nf.csv")).unwrap();
    session.run(Intent::PaymentMethodCount).unwrap();
    session.run(Intent::DistinctCustomersPerSeller).unwrap();
    assert_eq!(session.cache().len(), 1);
}

#[test]
fn test_cache_and_loader_directly() {
    let dir = fixture_dir();
    let loader = ExtractLoader::new(dir.path());
    let mut cache = ExtractCache::new();

    let extract = cache.get_or_load(ExtractKind::Sales, &loader).unwrap();
    assert_eq!(extract.separator(), b';');
    assert_eq!(extract.height(), 3);
    assert!(cache.contains(ExtractKind::Sales));
}

#[test]
fn test_config_file_overrides_file_name() {
    let dir = fixture_dir();
    fs::rename(
        dir.path().join("vw_vendas_mensais.csv"),
        dir.path().join("mensal.csv"),
    )
    .unwrap();
    let config_path = dir.path().join("viewer.json");
    fs::write(
        &config_path,
        r#"{"files": {"vendas_mensais": "mensal.csv"}}"#,
    )
    .unwrap();

    let config = ViewerConfig::resolve(Some(&config_path), Some(dir.path().to_path_buf())).unwrap();
    let mut session = Session::from_config(&config);
    let output = session.run(Intent::WorstMonths).unwrap();
    assert_eq!(output.sources, vec!["mensal.csv".to_string()]);
}

#[test]
fn test_question_to_rendered_report() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    let intent = intent_resolver::select(Intent::Help, Some("forma de pagamento que mais fatura"));
    assert_eq!(intent, Intent::PaymentMethodRevenue);

    let output = session.run(intent).unwrap();
    let text = render::render(&output, OutputFormat::Text).unwrap();
    assert!(text.contains("R$ 150,00"));
    assert!(text.contains("Source: vw_vendas_nf.csv"));

    let json: serde_json::Value =
        serde_json::from_str(&render::render(&output, OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["intent"], "payment_method_revenue");
    assert_eq!(json["table"]["rows"]["rows"][0]["key"], "pix");
}

#[test]
fn test_daily_series_orders_mixed_date_formats() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    let output = session.run(Intent::DailySeries).unwrap();
    match &output.table {
        ReportTable::Days(rows) => {
            let days: Vec<String> = rows
                .iter()
                .map(|r| r.date.map(|d| d.to_string()).unwrap_or_default())
                .collect();
            assert_eq!(days, ["2024-03-01", "2024-03-02", "2024-03-03", "2024-03-05"]);
            assert_eq!(rows[1].sale_count, Some(4));
        }
        other => panic!("unexpected table: {other:?}"),
    }
    assert_eq!(output.chart.unwrap().points.len(), 4);
    assert_eq!(output.sources, vec!["vw_vendas_diarias.csv".to_string()]);
}

#[test]
fn test_seller_mix_decodes_customer_type_and_share() {
    let dir = fixture_dir();
    let mut session = session(dir.path());

    let output = session.run(Intent::SellerCustomerMix).unwrap();
    match &output.table {
        ReportTable::SellerMix(rows) => {
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[0].customer_type, Some(CustomerType::Individual));
            assert_eq!(rows[1].customer_type, Some(CustomerType::Business));
            assert_eq!(rows[0].share_percent, Some(dec!(83.33)));
            assert_eq!(rows[2].revenue, Some(dec!(30)));
        }
        other => panic!("unexpected table: {other:?}"),
    }
}

#[test]
fn test_pt_br_thousands_keep_revenue() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "vw_vendas_nf.csv",
        "valor_venda;forma_pagamento\n1.234.567;pix\n10,00;pix\nR$ 1.500;boleto\n",
    );
    let mut session = session(dir.path());

    let output = session.run(Intent::GeneralKpis).unwrap();
    assert!(output.metrics.iter().any(|m| m.value == MetricValue::Money(dec!(1236077))));
    assert!(output.metrics.iter().any(|m| m.value == MetricValue::Count(3)));
}
