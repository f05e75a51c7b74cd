use coltable::{Column, ColumnView, DataType, Error, RowSet, Table, Value};

const INT: [i32; 12] = [-5, -1, 0, 4, 9, 12, 3, 3, 28, -5, -20, 10];
const DBL: [f64; 12] = [
    -1.5, -0.25, 0.25, 0.75, 4.5, -2.3, 3.14, 2.71, 0.0, 1.1, -3.3, 42.0,
];

fn sample_table() -> Table {
    let table = Table::new();
    table
        .insert_column(Column::from_values("INT", INT.to_vec()))
        .unwrap();
    table
        .insert_column(Column::from_values("DBL", DBL.to_vec()))
        .unwrap();
    table
        .insert_column(Column::from_values(
            "FLAG",
            INT.iter().map(|v| v % 2 == 0).collect::<Vec<_>>(),
        ))
        .unwrap();
    table
}

#[test]
fn int_filters() {
    let table = sample_table();
    let int = table.filter::<i32>("INT").unwrap();

    assert_eq!(int.gt(0).unwrap().indices(), &[3, 4, 5, 6, 7, 8, 11]);
    assert_eq!(int.between(-1, 4).unwrap().indices(), &[1, 2, 3, 6, 7]);
    assert_eq!(
        table.select::<i32>("INT").unwrap().gt(0).build().unwrap(),
        int.gt(0).unwrap()
    );
}

#[test]
fn dbl_between_is_inclusive() {
    let table = sample_table();
    let rows = table
        .select::<f64>("DBL")
        .unwrap()
        .between(0.25, 3.14)
        .build()
        .unwrap();
    assert_eq!(rows.indices(), &[2, 3, 6, 7, 9]);
}

#[test]
fn between_equals_ge_intersect_le() {
    let table = sample_table();
    let int = table.filter::<i32>("INT").unwrap();
    for (lo, hi) in [(-20, 28), (-5, -5), (0, 3), (4, 11), (29, 40)] {
        assert_eq!(
            int.between(lo, hi).unwrap(),
            int.ge(lo).unwrap().intersected(&int.le(hi).unwrap()),
            "between({lo}, {hi})"
        );
    }
}

#[test]
fn range_filter_with_and_or() {
    let table = sample_table();
    let int = table.filter::<i32>("INT").unwrap();

    let inside = int.gt(1).unwrap() & int.lt(10).unwrap();
    assert_eq!(inside.indices(), &[3, 4, 6, 7]);

    let outside = int.le(1).unwrap() | int.ge(10).unwrap();
    assert_eq!(outside, inside.complement(table.nrows()));
}

#[test]
fn cross_column_update() {
    let table = sample_table();
    table
        .handle("DBL")
        .unwrap()
        .where_column::<i32>("INT")
        .unwrap()
        .ge(3)
        .set(99.0)
        .unwrap();

    let dbl = table.column_values::<f64>("DBL").unwrap();
    for (row, (&int, &before)) in INT.iter().zip(DBL.iter()).enumerate() {
        if int >= 3 {
            assert_eq!(dbl[row], 99.0, "row {row}");
        } else {
            assert_eq!(dbl[row].to_bits(), before.to_bits(), "row {row}");
        }
    }
}

#[test]
fn scoped_mutation_leaves_other_rows_bit_identical() {
    let table = sample_table();
    let scope = table.filter::<bool>("FLAG").unwrap().eq(true).unwrap();
    let view = table.column::<f64>("DBL").unwrap().on(scope.clone());

    view.mul(3).unwrap().add(0.5_f32).unwrap();
    view.clear_selection().on(RowSet::new()).set(-1.0).unwrap();

    let after = view.snapshot().unwrap();
    for row in 0..DBL.len() {
        if scope.contains(row) {
            assert_eq!(after[row], DBL[row] * 3.0 + 0.5);
        } else {
            assert_eq!(after[row].to_bits(), DBL[row].to_bits());
        }
    }
}

#[test]
fn sort_is_stable_and_aligned() {
    let table = sample_table();
    table.column::<i32>("INT").unwrap().sort_ascending().unwrap();

    let ints = table.column_values::<i32>("INT").unwrap();
    let dbls = table.column_values::<f64>("DBL").unwrap();
    assert!(ints.windows(2).all(|w| w[0] <= w[1]));

    // Each row still pairs the same INT and DBL values.
    for (int, dbl) in ints.iter().zip(&dbls) {
        let original = (0..INT.len())
            .filter(|&i| INT[i] == *int)
            .map(|i| DBL[i])
            .collect::<Vec<_>>();
        assert!(original.contains(dbl));
    }
    // The two -5 rows (0 and 9) keep their relative order, as do the two 3s.
    assert_eq!(&dbls[1..3], &[-1.5, -3.3]);
    let threes: Vec<f64> = ints
        .iter()
        .zip(&dbls)
        .filter(|(i, _)| **i == 3)
        .map(|(_, d)| *d)
        .collect();
    assert_eq!(threes, vec![3.14, 2.71]);

    table.column::<f64>("DBL").unwrap().sort_descending().unwrap();
    let dbls = table.column_values::<f64>("DBL").unwrap();
    assert!(dbls.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(table.column_values::<i32>("INT").unwrap()[0], 10);
}

fn check_identities(values: &[f64], view: &ColumnView<'_, f64>) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let mean_sq = values.iter().map(|v| v * v).sum::<f64>() / n;
    let variance = mean_sq - mean * mean;
    let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * b.abs().max(1.0);

    assert!(close(view.mean().unwrap(), mean));
    assert!(close(view.variance().unwrap(), variance));
    assert!(close(view.rms().unwrap(), mean_sq.sqrt()));
    assert!(close(view.rmse().unwrap(), variance.sqrt()));
}

#[test]
fn aggregate_identities() {
    let table = sample_table();
    let dbl = table.column::<f64>("DBL").unwrap();

    check_identities(&DBL, &dbl);

    let scope = table.filter::<i32>("INT").unwrap().lt(5).unwrap();
    let scoped: Vec<f64> = scope.iter().map(|row| DBL[row]).collect();
    check_identities(&scoped, &dbl.on(scope));

    assert_eq!(
        dbl.on(RowSet::new()).mean(),
        Err(Error::EmptySelection("DBL".into()))
    );
}

#[test]
fn file_layer_round_trip() {
    // Reader side: build columns from runtime type codes.
    let table = Table::new();
    for (name, code, values) in [
        ("TIME", 'D', vec![Value::Float64(0.5), Value::Float64(1.5)]),
        ("PHA", 'I', vec![Value::Int16(12), Value::Int16(7)]),
        ("GOOD", 'L', vec![Value::Bool(true), Value::Bool(false)]),
    ] {
        let mut column = Column::new(name, DataType::from_tform_code(code).unwrap());
        for value in values {
            column.push_value(value).unwrap();
        }
        table.insert_column(column).unwrap();
    }

    table.column::<i16>("PHA").unwrap().sort_descending().unwrap();

    // Writer side: read everything back.
    assert_eq!(table.ncols(), 3);
    assert_eq!(table.nrows(), 2);
    assert_eq!(table.column_values::<f64>("TIME").unwrap(), vec![0.5, 1.5]);
    assert_eq!(
        table.get_row(1).unwrap(),
        vec![Value::Float64(1.5), Value::Int16(7), Value::Bool(false)]
    );
    assert_eq!(table.data_type("GOOD").unwrap().tform_code(), 'L');
}
