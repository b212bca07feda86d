use std::fmt;

pub type Res<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn write_to_file(file_path: &str, data: &str) -> Res {
    use std::io::Write;
    let path = std::path::Path::new(file_path);
    if let Some(prefix) = path.parent() {
        std::fs::create_dir_all(prefix)?;
    }
    let mut f = std::fs::File::create(path)?;
    write!(f, "{}", data)?;
    Ok(())
}

pub fn vec_count<T: PartialEq>(v: &[T], e: &T) -> usize {
    v.iter().filter(|&n| n == e).count()
}

pub fn vec_to_string<T: fmt::Display>(v: &[T]) -> String {
    let vs: Vec<String> = v.iter().map(|x| format!("{}", x)).collect();
    "[".to_string() + &vs.join(", ") + "]"
}

// 各配列から1つずつ要素を選んだすべての組み合わせ
pub fn cartesian_product<T>(vv: &[Vec<T>]) -> Vec<Vec<&T>> {
    if vv.is_empty() {
        return vec![vec![]];
    }
    if vv.iter().any(|v| v.is_empty()) {
        return vec![];
    }

    let lens: Vec<usize> = vv.iter().map(|l| l.len()).collect();
    let mut idxs = vec![0; vv.len()];
    let mut i = idxs.len() - 1;
    let mut res = vec![];
    loop {
        let mut v = vec![];
        for (i1, &i2) in idxs.iter().enumerate() {
            v.push(&vv[i1][i2]);
        }
        res.push(v);

        // increment idxs
        loop {
            if idxs[i] < lens[i] - 1 {
                idxs[i] += 1;
                i = idxs.len() - 1;
                break;
            } else {
                idxs[i] = 0;
                if i == 0 {
                    return res;
                }
            }
            i -= 1;
        }
    }
}

#[test]
fn test_cartesian_product() {
    let vv = vec![vec![1, 2], vec![3], vec![4, 5]];
    let res = cartesian_product(&vv);
    assert_eq!(res.len(), 4);
    assert_eq!(res[0], vec![&1, &3, &4]);
    assert_eq!(res[3], vec![&2, &3, &5]);

    let empty: Vec<Vec<usize>> = vec![vec![1], vec![]];
    assert!(cartesian_product(&empty).is_empty());
}
