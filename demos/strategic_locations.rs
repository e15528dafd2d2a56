use depot::strategic::{group_by_region, SelectionPolicy, StrategicSelector, WarehouseRecord};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=depot=debug shows every scored k.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let sites = [
        // usa: east coast, midwest, texas, west coast
        ("EWR1", 40.73, -74.17, "Newark", "NJ", "USA", "usa"),
        ("PHL4", 39.95, -75.16, "Philadelphia", "PA", "USA", "usa"),
        ("BWI2", 39.29, -76.61, "Baltimore", "MD", "USA", "usa"),
        ("BOS7", 42.36, -71.06, "Boston", "MA", "USA", "usa"),
        ("ORD2", 41.88, -87.63, "Chicago", "IL", "USA", "usa"),
        ("MKE1", 43.04, -87.91, "Milwaukee", "WI", "USA", "usa"),
        ("IND9", 39.77, -86.16, "Indianapolis", "IN", "USA", "usa"),
        ("DFW7", 32.78, -96.80, "Dallas", "TX", "USA", "usa"),
        ("HOU2", 29.76, -95.37, "Houston", "TX", "USA", "usa"),
        ("SAT1", 29.42, -98.49, "San Antonio", "TX", "USA", "usa"),
        ("LAX9", 34.05, -118.24, "Los Angeles", "CA", "USA", "usa"),
        ("SAN3", 32.72, -117.16, "San Diego", "CA", "USA", "usa"),
        ("OAK4", 37.80, -122.27, "Oakland", "CA", "USA", "usa"),
        ("SEA6", 47.61, -122.33, "Seattle", "WA", "USA", "usa"),
        // europe
        ("BER3", 52.52, 13.40, "Berlin", "BE", "Germany", "europe"),
        ("MUC3", 48.14, 11.58, "Munich", "BY", "Germany", "europe"),
        ("CDG7", 48.86, 2.35, "Paris", "IDF", "France", "europe"),
        ("LYS1", 45.76, 4.84, "Lyon", "ARA", "France", "europe"),
        ("MAD4", 40.42, -3.70, "Madrid", "MD", "Spain", "europe"),
        ("BCN1", 41.39, 2.17, "Barcelona", "CT", "Spain", "europe"),
        ("MXP5", 45.46, 9.19, "Milan", "LOM", "Italy", "europe"),
        ("FCO1", 41.90, 12.50, "Rome", "LAZ", "Italy", "europe"),
        // smaller regions
        ("NRT1", 35.68, 139.69, "Tokyo", "13", "Japan", "japan"),
        ("KIX2", 34.69, 135.50, "Osaka", "27", "Japan", "japan"),
        ("SYD1", -33.87, 151.21, "Sydney", "NSW", "Australia", "australia"),
        ("MEL1", -37.81, 144.96, "Melbourne", "VIC", "Australia", "australia"),
        ("BNE1", -27.47, 153.03, "Brisbane", "QLD", "Australia", "australia"),
        ("PER1", -31.95, 115.86, "Perth", "WA", "Australia", "australia"),
    ];
    let records = sites
        .iter()
        .map(|&(name, lat, lon, city, state, country, region)| {
            WarehouseRecord::new(name, lat, lon, city, state, country, region)
        });
    let groups = group_by_region(records, |w| w.region.as_str());

    let selection = StrategicSelector::new(SelectionPolicy::default())
        .with_seed(2024)
        .select(groups.iter().map(|(r, ws)| (r.as_str(), ws.as_slice())))?;

    for summary in &selection.regions {
        println!(
            "{:<10} n={:<3} k={:<2} score={:<8} selected={}",
            summary.region,
            summary.input_count,
            summary.k,
            summary
                .score
                .map_or_else(|| "-".to_string(), |s| format!("{s:.3}")),
            summary.selected
        );
    }
    println!();
    for w in &selection.records {
        println!("{:<6} {:<14} {:<10} ({:.2}, {:.2})", w.name, w.city, w.country, w.latitude, w.longitude);
    }

    Ok(())
}
