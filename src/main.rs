use std::env;
use std::process::ExitCode;

use station_graph::import::parse_dataset;
use station_graph::models::to_records;
use station_graph::topology;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let Some(data_path) = args.get(1) else {
        eprintln!("usage: station_graph <dataset> [railway-id]");
        return ExitCode::FAILURE;
    };

    let content = match std::fs::read_to_string(data_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("failed to read {data_path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let net = match parse_dataset(&content) {
        Ok(net) => net,
        Err(e) => {
            eprintln!("failed to parse {data_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(id_arg) = args.get(2) {
        let Ok(id) = id_arg.parse::<u32>() else {
            eprintln!("invalid railway id '{id_arg}'");
            return ExitCode::FAILURE;
        };
        let railway_stations = net.stations_of(id);
        match topology::railway_next_stations(net.paths_of(id), &railway_stations) {
            Ok(infos) => {
                let records = to_records(&infos, &railway_stations);
                match serde_json::to_string_pretty(&records) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("failed to serialize railway {id}: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            }
            Err(diagnostic) => {
                eprintln!("railway {id}: {diagnostic}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    let mut output = serde_json::Map::new();
    for (id, result) in topology::analyze(&net) {
        match result {
            Ok(infos) => {
                let railway_stations = net.stations_of(id);
                let records = to_records(&infos, &railway_stations);
                match serde_json::to_value(&records) {
                    Ok(value) => {
                        output.insert(id.to_string(), value);
                    }
                    Err(e) => eprintln!("railway {id}: serialization failed: {e}"),
                }
            }
            Err(diagnostic) => eprintln!("railway {id}: {diagnostic}"),
        }
    }
    println!("{}", serde_json::Value::Object(output));
    ExitCode::SUCCESS
}
