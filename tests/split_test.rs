//! 分割処理の統合テスト
//!
//! rust_xlsxwriterで入力ブックを作り、出力ZIPをzip + calamineで読み戻して確認する。

use agency_split::export::archive_digest;
use agency_split::split::{split_workbook, SplitOptions};
use agency_split_common::{AliasConfig, ReportLayout};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::io::{Cursor, Read};

enum Cell<'a> {
    S(&'a str),
    N(f64),
    E,
}

fn write_rows(sheet: &mut Worksheet, start_row: u32, rows: &[&[Cell]]) {
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (start_row + r as u32, c as u16);
            match cell {
                Cell::S(s) => {
                    sheet.write_string(r, c, *s).unwrap();
                }
                Cell::N(n) => {
                    sheet.write_number(r, c, *n).unwrap();
                }
                Cell::E => {}
            }
        }
    }
}

/// A（ALTAS 3 / BASE 3）と B（ALTAS 2 / BASE 1）の入力
fn corte1_input() -> Vec<u8> {
    use Cell::*;
    let mut workbook = Workbook::new();

    let report = workbook.add_worksheet();
    report.set_name("Reporte Agencia").unwrap();
    write_rows(report, 0, &[&[S("LIMA - CORTE 1")], &[E]]);
    write_rows(
        report,
        2,
        &[
            &[S("RUC"), S("AGENCIA"), S("META"), S("GRUPO"), S("ALTAS"), S("CUMPLIMIENTO ALTAS %")],
            &[N(1.0), S("A"), N(10.0), S("G1"), N(3.0), N(0.3)],
            &[N(2.0), S("B "), N(10.0), S("G1"), N(2.0), N(0.2)],
        ],
    );

    let base = workbook.add_worksheet();
    base.set_name("BASE").unwrap();
    write_rows(
        base,
        0,
        &[
            &[S("ASESOR"), S("COD_PEDIDO")],
            &[S("A"), S("P1")],
            &[S("a"), S("P2")],
            &[S("A\u{a0}"), S("P3")],
            &[S("B"), S("P4")],
            &[S("C"), S("P5")],
        ],
    );

    workbook.save_to_buffer().unwrap()
}

fn corte2_input() -> Vec<u8> {
    use Cell::*;
    let mut workbook = Workbook::new();

    let report = workbook.add_worksheet();
    report.set_name("Reporte CORTE 2").unwrap();
    write_rows(
        report,
        0,
        &[
            &[E, E, E, E, E, E, S("PENALIDAD 1"), E, S("CLAWBACK 1"), E],
            &[
                S("RUC"),
                S("AGENCIA"),
                S("META"),
                S("GRUPO"),
                S("ALTAS"),
                S("TOTAL A PAGAR CORTE 2"),
                S("UMBRAL"),
                S("PENALIDAD 1"),
                S("CUMPLIMIENTO CORTE 2 %"),
                S("CLAWBACK 1"),
            ],
            &[N(1.0), S("EXPORTEL S.A.C."), N(5.0), S("G"), N(2.0), N(1500.0), N(0.05), N(-20.0), N(0.9), N(-10.0)],
        ],
    );

    let base = workbook.add_worksheet();
    base.set_name("BASE").unwrap();
    write_rows(
        base,
        0,
        &[
            &[S("ASESOR"), S("COD_PEDIDO")],
            &[S("EXPORTEL S.A.C."), S("P1")],
            &[S("EXPORTEL PROVINCIA"), S("P2")],
            &[S("OTRA"), S("P3")],
        ],
    );

    workbook.save_to_buffer().unwrap()
}

fn entry_names(archive: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    archive.file_names().map(|n| n.to_string()).collect()
}

fn read_entry(archive: &[u8], name: &str) -> Xlsx<Cursor<Vec<u8>>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut bytes = Vec::new();
    archive.by_name(name).unwrap().read_to_end(&mut bytes).unwrap();
    open_workbook_from_rs(Cursor::new(bytes)).unwrap()
}

#[test]
fn test_corte1_split_and_reconcile() {
    let outcome = split_workbook(corte1_input(), &SplitOptions::new(ReportLayout::corte1()));
    let archive = outcome.archive.as_ref().expect("archive expected");

    let mut names = entry_names(archive);
    names.sort();
    assert_eq!(names, vec!["Reporte A.xlsx", "Reporte B.xlsx"]);

    assert!(outcome.log.contains("✓ Agencias procesadas exitosamente: 1"));
    assert!(outcome.log.contains("⚠ Agencias con descuadre: 1"));
    assert!(outcome.log.contains("📁 Total de archivos generados: 2"));
    assert!(outcome
        .log
        .lines()
        .iter()
        .any(|l| l.starts_with("⚠ B") && l.ends_with("⚠ DESCUADRE")));

    let mut book = read_entry(archive, "Reporte A.xlsx");
    assert_eq!(book.sheet_names(), vec!["Reporte Agencia", "BASE"]);

    let report = book.worksheet_range("Reporte Agencia").unwrap();
    assert_eq!(report.get_size(), (2, 6));
    assert_eq!(report.get((0, 1)), Some(&Data::String("AGENCIA".into())));
    assert_eq!(report.get((1, 4)), Some(&Data::Float(3.0)));

    // 大文字小文字・NBSPの違うASESORも同じエージェンシー
    let base = book.worksheet_range("BASE").unwrap();
    assert_eq!(base.get_size(), (4, 2));
}

#[test]
fn test_corte2_two_level_with_alias() {
    let mut options = SplitOptions::new(ReportLayout::corte2());
    options.aliases = AliasConfig::from_preset("lima").unwrap();
    let outcome = split_workbook(corte2_input(), &options);
    let archive = outcome.archive.as_ref().expect("archive expected");

    assert_eq!(entry_names(archive), vec!["Reporte Corte 2 EXPORTEL SAC.xlsx"]);
    assert!(outcome.log.contains("✓ Agencias procesadas exitosamente: 1"));
    assert!(!outcome.log.lines().iter().any(|l| l.starts_with("⚠ Agencias con descuadre")));

    let mut book = read_entry(archive, "Reporte Corte 2 EXPORTEL SAC.xlsx");
    let report = book.worksheet_range("Reporte CORTE 2").unwrap();
    let header: Vec<String> = report.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
    assert_eq!(
        header,
        vec![
            "RUC",
            "AGENCIA",
            "META",
            "GRUPO",
            "ALTAS",
            "TOTAL A PAGAR CORTE 2",
            "PENALIDAD 1 - UMBRAL",
            "PENALIDAD 1",
            "CLAWBACK 1 - CUMPLIMIENTO CORTE 2 %",
            "CLAWBACK 1",
        ]
    );

    let base = book.worksheet_range("BASE").unwrap();
    assert_eq!(base.get_size(), (3, 2));
}

#[test]
fn test_split_is_idempotent() {
    let first = split_workbook(corte1_input(), &SplitOptions::new(ReportLayout::corte1()));
    // 秒単位の時刻が変わってもZIPは同じ
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let second = split_workbook(corte1_input(), &SplitOptions::new(ReportLayout::corte1()));

    let first = first.archive.expect("archive expected");
    let second = second.archive.expect("archive expected");
    assert_eq!(archive_digest(&first), archive_digest(&second));
}

#[test]
fn test_wrong_layout_reports_missing_sheet() {
    let outcome = split_workbook(corte1_input(), &SplitOptions::new(ReportLayout::corte2()));

    assert!(outcome.archive.is_none());
    assert!(outcome.log.contains("✗ No se encontró la hoja de reporte"));
    assert!(outcome
        .log
        .lines()
        .iter()
        .any(|l| l.starts_with("  Hojas disponibles:") && l.contains("Reporte Agencia")));
}
