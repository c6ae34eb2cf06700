/* C round-trip test
 *
 * Compiles the generated code against a cJSON checkout and runs a driver that
 * serializes, parses back and compares. Needs CJSON_DIR (a directory holding
 * cJSON.h and cJSON.c) and gcc on PATH; skipped otherwise.
 */

use layout_gen::config::GeneratorConfig;
use layout_gen::{generate, GenerationRequest};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const SCHEMA: &str = r#"{"types": {
    "Color": {"kind": "enum", "underlying": "int", "values": [
        {"name": "RED", "value": 0},
        {"name": "GREEN", "value": 1},
        {"name": "BLUE", "value": 2}
    ]},
    "Point": {"kind": "struct", "size": 8, "fields": [
        {"name": "x", "type": "float", "offset": 0, "size": 4},
        {"name": "y", "type": "float", "offset": 4, "size": 4}
    ]},
    "Line": {"kind": "struct", "size": 16, "fields": [
        {"name": "a", "type": "Point", "offset": 0, "size": 8},
        {"name": "b", "type": "Point", "offset": 8, "size": 8}
    ]},
    "Sample": {"kind": "struct", "fields": [
        {"name": "id", "type": "int32_t"},
        {"name": "ratio", "type": "double"},
        {"name": "enabled", "type": "bool"},
        {"name": "color", "type": "Color"},
        {"name": "values", "type": "float[5]"},
        {"name": "name", "type": "char[8]"},
        {"name": "label", "type": "char*"},
        {"name": "path", "type": "Point[2]"},
        {"name": "handle", "type": "void*"}
    ]}
}}"#;

const TYPES_H: &str = r#"#pragma once
#include <stdbool.h>
#include <stdint.h>

typedef enum { RED = 0, GREEN = 1, BLUE = 2 } Color;

typedef struct { float x; float y; } Point;

typedef struct { Point a; Point b; } Line;

typedef struct {
    int32_t id;
    double ratio;
    bool enabled;
    Color color;
    float values[5];
    char name[8];
    char *label;
    Point path[2];
    void *handle;
} Sample;
"#;

const DRIVER_C: &str = r#"#include <stdio.h>
#include <stdlib.h>
#include <string.h>
#include "roundtrip_json.h"

static int check_line(void) {
    Line in = { { 1.5f, -2.0f }, { 3.25f, 4.0f } };
    Line out;
    memset(&out, 0, sizeof(out));

    cJSON *obj = cJSON_CreateObject();
    Line_to_json(&in, obj);
    char *text = cJSON_PrintUnformatted(obj);
    cJSON *parsed = cJSON_Parse(text);
    Line_from_json(&out, parsed);

    int ok = Line_equals(&in, &out);
    cJSON_Delete(parsed);
    cJSON_free(text);
    cJSON_Delete(obj);
    return ok;
}

static int check_sample(void) {
    Sample in;
    memset(&in, 0, sizeof(in));
    in.id = -42;
    in.ratio = 0.125;
    in.enabled = true;
    in.color = BLUE;
    for (int i = 0; i < 5; ++i) in.values[i] = (float)i * 0.5f;
    memcpy(in.name, "alpha", 6);
    in.label = "hello";
    in.path[1].x = 7.0f;

    Sample out;
    memset(&out, 0, sizeof(out));

    cJSON *obj = cJSON_CreateObject();
    Sample_to_json(&in, obj);
    Sample_from_json(&out, obj);

    int ok = Sample_equals(&in, &out);
    if (ok && strcmp(out.label, "hello") != 0) ok = 0;

    out.values[3] += 1.0f;
    if (Sample_equals(&in, &out)) ok = 0;

    free(out.label);
    cJSON_Delete(obj);
    return ok;
}

static int check_truncation(void) {
    Sample s;
    memset(&s, 0, sizeof(s));
    s.values[4] = 9.0f;

    cJSON *obj = cJSON_Parse("{\"name\":\"abcdefghijk\",\"values\":[1,2,\"x\",4,5,6,7]}");
    Sample_from_json(&s, obj);
    int ok = strcmp(s.name, "abcdefg") == 0
        && s.values[0] == 1.0f && s.values[2] == 0.0f && s.values[3] == 4.0f && s.values[4] == 5.0f;
    cJSON_Delete(obj);
    return ok;
}

static int check_short_input_keeps_slots(void) {
    Sample s;
    memset(&s, 0, sizeof(s));
    s.values[3] = 8.0f;
    s.values[4] = 9.0f;

    cJSON *obj = cJSON_Parse("{\"values\":[1,2,3]}");
    Sample_from_json(&s, obj);
    int ok = s.values[2] == 3.0f && s.values[3] == 8.0f && s.values[4] == 9.0f;
    cJSON_Delete(obj);
    return ok;
}

static int check_buffer_padding_matters(void) {
    Sample a, b;
    memset(&a, 0, sizeof(a));
    memset(&b, 0, sizeof(b));
    memcpy(a.name, "ab", 3);
    memcpy(b.name, "ab", 3);
    b.name[5] = 'z';
    return !Sample_equals(&a, &b);
}

static int check_null_label(void) {
    Sample a, b;
    memset(&a, 0, sizeof(a));
    memset(&b, 0, sizeof(b));
    if (!Sample_equals(&a, &b)) return 0;
    b.label = "x";
    if (Sample_equals(&a, &b)) return 0;

    cJSON *obj = cJSON_CreateObject();
    Sample_to_json(&a, obj);
    cJSON *label = cJSON_GetObjectItemCaseSensitive(obj, "label");
    int ok = cJSON_IsString(label) && strcmp(label->valuestring, "") == 0;
    cJSON_Delete(obj);
    return ok;
}

int main(void) {
    if (!check_line()) { puts("line"); return 1; }
    if (!check_sample()) { puts("sample"); return 1; }
    if (!check_truncation()) { puts("truncation"); return 1; }
    if (!check_short_input_keeps_slots()) { puts("short input"); return 1; }
    if (!check_buffer_padding_matters()) { puts("buffer padding"); return 1; }
    if (!check_null_label()) { puts("null label"); return 1; }
    return 0;
}
"#;

fn cjson_dir() -> Option<PathBuf> {
    let dir = PathBuf::from(std::env::var_os("CJSON_DIR")?);
    if dir.join("cJSON.h").is_file() && dir.join("cJSON.c").is_file() {
        Some(dir)
    } else {
        None
    }
}

fn gcc_available() -> bool {
    Command::new("gcc").arg("--version").output().map(|o| o.status.success()).unwrap_or(false)
}

fn compile_and_run(dir: &Path, cjson: &Path, generated: &Path) -> Result<(), String> {
    let exe = dir.join("roundtrip");
    let output = Command::new("gcc")
        .arg("-std=c11")
        .arg("-Wall")
        .arg(format!("-I{}", dir.display()))
        .arg(format!("-I{}", cjson.display()))
        .arg(generated)
        .arg(dir.join("driver.c"))
        .arg(cjson.join("cJSON.c"))
        .arg("-lm")
        .arg("-o")
        .arg(&exe)
        .output()
        .map_err(|e| format!("Failed to run gcc: {}", e))?;

    if !output.status.success() {
        return Err(format!("GCC compilation failed:\n{}", String::from_utf8_lossy(&output.stderr)));
    }

    let run = Command::new(&exe).output().map_err(|e| format!("Failed to run driver: {}", e))?;
    if !run.status.success() {
        return Err(format!("Round trip failed at: {}", String::from_utf8_lossy(&run.stdout)));
    }
    Ok(())
}

#[test]
fn test_c_round_trip() {
    let Some(cjson) = cjson_dir() else {
        eprintln!("CJSON_DIR not set, skipping C round-trip test");
        return;
    };
    if !gcc_available() {
        eprintln!("gcc not found, skipping C round-trip test");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    fs::write(&schema, SCHEMA).unwrap();
    fs::write(dir.path().join("types.h"), TYPES_H).unwrap();
    fs::write(dir.path().join("driver.c"), DRIVER_C).unwrap();

    let request = GenerationRequest {
        inputs: vec![schema],
        roots: vec!["Line".to_string(), "Sample".to_string()],
        out_base: dir.path().join("roundtrip_json"),
        config: GeneratorConfig::default(),
    };
    let report = generate(&request).unwrap();
    assert_eq!(report.diagnostics.len(), 1);

    compile_and_run(dir.path(), &cjson, &report.source_path).unwrap();
}
