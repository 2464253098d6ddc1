// End-to-end checks for the directory binaries: payload files go in through
// `--input`, pages and NDJSON come out, and config handling is exercised on
// real files so regressions surface in one place.
mod support;

use anyhow::Result;
use serde_json::json;
use support::{
    command, json_fixture, render_page, run_command, run_with_stdin, search_lines, text_fixture,
};

fn sample_payload() -> serde_json::Value {
    json!({
        "lastUpdated": "2024-05-01",
        "items": [
            {
                "nombre": "Taller B",
                "categoria": "Mecánica",
                "telefono": "600 111 222 / 600333444",
                "direccion": "Calle Mayor 1",
                "email": "taller@example.es",
                "web": "taller.example.es"
            },
            {"nombre": "Clínica Norte", "categoria": "Salud", "activo": "sí"},
            {"nombre": "Clinica A", "categoria": "Salud", "activo": "no"},
            {"nombre": "Panadería Sol", "categoria": "alimentación", "activo": 1}
        ]
    })
}

#[test]
fn inactive_only_payload_renders_no_cards() -> Result<()> {
    let fixture = json_fixture(&json!({"items": [{"nombre": "Clinica A", "activo": "no"}]}))?;
    let page = render_page(fixture.path(), &[])?;
    assert!(page.contains("✅ Directorio cargado: 0 entradas."));
    assert!(page.contains("No hay resultados con esos filtros."));
    assert!(!page.contains("Clinica A"));
    Ok(())
}

#[test]
fn single_record_renders_card_and_category_option() -> Result<()> {
    let fixture = json_fixture(&json!([{"nombre": "Taller B", "categoria": "Mecánica"}]))?;
    let page = render_page(fixture.path(), &[])?;
    assert!(page.contains("<h3 class=\"card-title\">Taller B</h3>"));
    assert!(page.contains("<option value=\"Mecánica\">Mecánica</option>"));
    assert!(page.contains("✅ Directorio cargado: 1 entradas."));
    assert!(page.contains("Última actualización: —"));
    // No phone, address or email: only the report button remains.
    assert!(!page.contains("Llamar"));
    assert!(!page.contains("Cómo llegar"));
    assert!(page.contains("aria-disabled=\"true\">⚠️ Dato incorrecto"));
    Ok(())
}

#[test]
fn unrecognized_payload_shape_loads_zero_records() -> Result<()> {
    let fixture = json_fixture(&json!({"foo": 1}))?;
    let page = render_page(fixture.path(), &[])?;
    assert!(page.contains("✅ Directorio cargado: 0 entradas."));
    assert!(page.contains("No hay resultados con esos filtros."));
    Ok(())
}

#[test]
fn invalid_json_reports_failure_without_failing_the_command() -> Result<()> {
    let fixture = text_fixture("{not json")?;
    let page = render_page(fixture.path(), &[])?;
    assert!(page.contains("❌ No se pudo cargar el directorio"));
    assert!(page.contains("No hay resultados con esos filtros."));
    Ok(())
}

#[test]
fn categories_follow_spanish_order_and_preselect() -> Result<()> {
    let fixture = json_fixture(&sample_payload())?;
    let page = render_page(fixture.path(), &["--category", "Salud"])?;
    let alimentacion = page.find(">alimentación</option>").expect("alimentación option");
    let mecanica = page.find(">Mecánica</option>").expect("Mecánica option");
    let salud = page.find(">Salud</option>").expect("Salud option");
    assert!(alimentacion < mecanica && mecanica < salud);
    assert!(page.contains("<option value=\"Salud\" selected>Salud</option>"));
    assert!(page.contains("Clínica Norte"));
    assert!(!page.contains("Taller B"));
    assert!(page.contains("Última actualización: 2024-05-01"));
    Ok(())
}

#[test]
fn search_streams_visible_records_with_links() -> Result<()> {
    let fixture = json_fixture(&sample_payload())?;
    let lines = search_lines(fixture.path(), &["--query", "MAYOR"])?;
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line["name"], "Taller B");
    assert_eq!(line["category"], "Mecánica");
    assert!(line.get("search_index").is_none());

    let links = &line["links"];
    assert_eq!(
        links["dial"],
        json!([
            {"display_text": "600 111 222", "dial_target": "600111222"},
            {"display_text": "600333444", "dial_target": "600333444"}
        ])
    );
    assert_eq!(
        links["directions"],
        "https://www.google.com/maps/dir/?api=1&destination=Calle%20Mayor%201"
    );
    assert_eq!(links["website"], "https://taller.example.es");
    assert!(
        links["mail"]
            .as_str()
            .is_some_and(|mail| mail.starts_with("mailto:taller%40example.es?subject=Consulta%20sobre%20Taller%20B"))
    );
    assert_eq!(links["report"], "#");
    Ok(())
}

#[test]
fn search_is_accent_insensitive_and_keeps_snapshot_order() -> Result<()> {
    let fixture = json_fixture(&sample_payload())?;
    let names: Vec<String> = search_lines(fixture.path(), &["--query", "clinica"])?
        .iter()
        .filter_map(|line| line["name"].as_str().map(str::to_string))
        .collect();
    assert_eq!(names, vec!["Clínica Norte"]);

    let all: Vec<String> = search_lines(fixture.path(), &[])?
        .iter()
        .filter_map(|line| line["name"].as_str().map(str::to_string))
        .collect();
    assert_eq!(all, vec!["Taller B", "Clínica Norte", "Panadería Sol"]);
    Ok(())
}

#[test]
fn strict_active_values_drop_loose_truthy_spellings() -> Result<()> {
    let fixture = json_fixture(&sample_payload())?;
    let names: Vec<String> = search_lines(fixture.path(), &["--active-values", "true"])?
        .iter()
        .filter_map(|line| line["name"].as_str().map(str::to_string))
        .collect();
    // Only the record without an `activo` flag survives.
    assert_eq!(names, vec!["Taller B"]);
    Ok(())
}

#[test]
fn configured_form_prefills_report_links() -> Result<()> {
    let config = json_fixture(&json!({
        "page_url": "https://dir.example/",
        "issue_form": {
            "base_url": "https://forms.example/viewform?usp=pp_url",
            "general_url": "https://forms.example/general",
            "fields": {"service_name": "101", "wrong_field": "102", "source_url": "103"}
        }
    }))?;
    let payload = json_fixture(&sample_payload())?;
    let config_path = config.path().to_string_lossy().into_owned();

    let lines = search_lines(payload.path(), &["--config", &config_path, "--query", "taller"])?;
    assert_eq!(
        lines[0]["links"]["report"],
        "https://forms.example/viewform?usp=pp_url&entry.101=Taller+B&entry.102=Tel%C3%A9fono&entry.103=https%3A%2F%2Fdir.example%2F"
    );

    let page = render_page(payload.path(), &["--config", &config_path])?;
    assert!(page.contains(
        "<a id=\"generalReportLink\" href=\"https://forms.example/general\" target=\"_blank\" rel=\"noopener noreferrer\">"
    ));
    Ok(())
}

#[test]
fn missing_endpoint_is_reported_as_not_configured() -> Result<()> {
    let output = run_command(command("directory-render"))?;
    let page = String::from_utf8(output.stdout)?;
    assert!(page.contains("⚠️ Falta configurar la URL JSON del directorio."));
    assert!(page.contains("No hay resultados con esos filtros."));

    // Search refuses to print an empty result set for a directory it never loaded.
    let output = command("directory-search").output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Falta configurar"));
    Ok(())
}

#[test]
fn placeholder_endpoint_counts_as_unconfigured() -> Result<()> {
    let config = json_fixture(&json!({
        "directory_json_url": "PEGA_AQUI_TU_URL_JSON_DEL_DIRECTORIO"
    }))?;
    let mut cmd = command("directory-render");
    cmd.env("DIRECTORIO_CONFIG", config.path());
    let page = String::from_utf8(run_command(cmd)?.stdout)?;
    assert!(page.contains("⚠️ Falta configurar la URL JSON del directorio."));
    Ok(())
}

#[test]
fn invalid_config_fails_schema_validation() -> Result<()> {
    let config = json_fixture(&json!({"directory_json_url": "https://x", "colour": "red"}))?;
    let mut cmd = command("directory-render");
    cmd.arg("--config").arg(config.path());
    let output = cmd.output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed schema validation"));
    Ok(())
}

#[test]
fn shell_applies_commands_in_order() -> Result<()> {
    let fixture = json_fixture(&sample_payload())?;
    let mut cmd = command("directory-shell");
    cmd.arg("--input").arg(fixture.path());
    let output = run_with_stdin(
        cmd,
        "query clinica\ncategory Mecánica\nbogus\ncategory __all__\nquery\nshow\nquit\nquery never\n",
    )?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let blocks: Vec<&str> = stdout.split("status: ").skip(1).collect();
    assert_eq!(blocks.len(), 6, "startup plus five views:\n{stdout}");
    assert!(blocks[0].contains("visible: 3/3"));
    assert!(blocks[1].contains("visible: 1/3\n- Clínica Norte"));
    assert!(blocks[2].contains("visible: 0/3"));
    assert!(blocks[3].contains("category=__all__ query=\"clinica\""));
    assert!(blocks[5].contains("visible: 3/3"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command: bogus"));
    Ok(())
}
