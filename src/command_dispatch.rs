//! Purpose: Hold top-level CLI command dispatch for `rowset`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Every command loads the dump once and reads only from the buffered table.
//! Invariants: Row selection goes through `seek`; out-of-range rows are usage errors.

use super::*;
use rowset::api::{category_of, format_timestamp};

pub(super) fn dispatch_command(command: Command, options: TableOptions) -> Result<RunOutcome, Error> {
    match command {
        Command::Columns { file } => {
            let table = load_table(&file, options)?;
            for column in table.columns() {
                let category = category_of(&column.declared_type).map(|category| category.as_str());
                emit_json(json!({
                    "name": column.name,
                    "type": column.declared_type,
                    "category": category,
                }));
            }
            Ok(RunOutcome::ok())
        }
        Command::Rows { file, row } => {
            let mut table = load_table(&file, options)?;
            if let Some(row) = row {
                seek_row(&mut table, row)?;
                emit_json(Value::Object(table.to_json_row()?));
            } else {
                while table.next() {
                    emit_json(Value::Object(table.to_json_row()?));
                }
            }
            Ok(RunOutcome::ok())
        }
        Command::Get {
            file,
            row,
            column,
            read_as,
        } => {
            let mut table = load_table(&file, options)?;
            seek_row(&mut table, row)?;
            let value = read_value(&table, &column, read_as)?;
            emit_json(json!({ "row": row, "column": column, "value": value }));
            Ok(RunOutcome::ok())
        }
    }
}

fn seek_row(table: &mut ResultTable, row: usize) -> Result<(), Error> {
    let landed = isize::try_from(row).is_ok_and(|row| table.seek(row));
    if !landed {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!(
                "row {row} is out of range (rows: {})",
                table.row_count()
            ))
            .with_hint("Rows are numbered from 0; use `rowset rows <file>` to list them."));
    }
    Ok(())
}

fn read_value(table: &ResultTable, column: &str, read_as: ReadAs) -> Result<Value, Error> {
    let value = match read_as {
        ReadAs::Auto => table.get(column)?.to_json(),
        ReadAs::Int => json!(table.get_int(column)?),
        ReadAs::Int64 => json!(table.get_int64(column)?),
        ReadAs::Float32 => json!(table.get_float32(column)?),
        ReadAs::Float64 => json!(table.get_float64(column)?),
        ReadAs::String => json!(table.get_string(column)?),
        ReadAs::Time => json!(format_timestamp(table.get_time(column)?)),
    };
    Ok(value)
}
