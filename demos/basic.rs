/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

use rowcast::*;

#[derive(Mapped, Debug, Default)]
#[mapped(default)]
pub struct Address {
    pub city: String,
    pub zip: Option<String>,
}

#[derive(Mapped, Debug, Default)]
#[mapped(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[mapped(alias = "mail")]
    pub email: Option<String>,
    pub address: Option<Address>,
}

fn main() -> anyhow::Result<()> {
    let schema = RowSchema::default()
        .typed_column("Id", "BIGINT")
        .typed_column("Name", "varchar(32)")
        .typed_column("mail", "text")
        .typed_column("Address_City", "varchar(32)")
        .typed_column("Address_Zip", "char(5)");
    let mut rows = Rows::new(schema);
    rows.push_values(vec![Value::Bigint(1), "Jack".into(), "jack@example.com".into(), "Oslo".into(), "0150".into()]);
    rows.push_values(vec![Value::Bigint(2), "Jill".into(), Value::Null, Value::Null, Value::Null]);
    println!("{} rows", rows.data.len());

    let registry = MapperRegistry::new(MapperConfig::default());
    let users: Vec<User> = registry.map_rows(&rows)?;
    for user in &users {
        println!("{:?}", user);
    }

    let pairs: Vec<(i64, String)> = registry.map_rows(&rows)?;
    println!("{:?}", pairs);
    println!("{:?}", registry.cache_stats());
    Ok(())
}
